//! Core value-domain types: logical arguments, SQL types, and bound
//! query parameters.

pub mod arg_meta;
pub mod parameter;
pub mod sql_type;

pub use arg_meta::{ArgMetaInfo, AudlangType};
pub use parameter::{MatchOperator, PreparedStatementSink, QueryParameter};
pub use sql_type::{AdlSqlType, SqlType};
