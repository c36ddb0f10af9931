//! Table nature
//!
//! A closed enumeration over four orthogonal bits. The named constructors
//! cover the commonly named combinations; `TableNature::custom`
//! exists for the remaining orthogonal combinations a builder can still
//! reach (e.g. a plain `ID_SUBSET` table that is also marked sparse but
//! not unique is just `ID_SUBSET_SPARSE`, already named below).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableNature {
    is_primary: bool,
    contains_all_ids: bool,
    sparse: bool,
    unique_ids: bool,
}

impl TableNature {
    pub fn custom(is_primary: bool, contains_all_ids: bool, sparse: bool, unique_ids: bool) -> Self {
        Self {
            is_primary,
            contains_all_ids,
            sparse,
            unique_ids,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn contains_all_ids(&self) -> bool {
        self.contains_all_ids
    }

    pub fn is_sparse(&self) -> bool {
        self.sparse
    }

    pub fn unique_ids(&self) -> bool {
        self.unique_ids
    }

    /// Returns this nature with `contains_all_ids` forced on, leaving the
    /// other bits untouched. Used by `SingleTableConfig` to apply the
    /// "any always-known column implies contains-all-ids" rule
    /// without mutating the builder-declared nature in place.
    pub fn with_contains_all_ids(self) -> Self {
        Self {
            contains_all_ids: true,
            ..self
        }
    }

    pub const PRIMARY: TableNature = TableNature {
        is_primary: true,
        contains_all_ids: true,
        sparse: false,
        unique_ids: false,
    };

    pub const PRIMARY_SPARSE: TableNature = TableNature {
        is_primary: true,
        contains_all_ids: true,
        sparse: true,
        unique_ids: false,
    };

    pub const PRIMARY_UNIQUE: TableNature = TableNature {
        is_primary: true,
        contains_all_ids: true,
        sparse: false,
        unique_ids: true,
    };

    pub const ID_SUBSET: TableNature = TableNature {
        is_primary: false,
        contains_all_ids: false,
        sparse: false,
        unique_ids: false,
    };

    pub const ID_SUBSET_SPARSE: TableNature = TableNature {
        is_primary: false,
        contains_all_ids: false,
        sparse: true,
        unique_ids: false,
    };

    pub const ID_SUBSET_UNIQUE: TableNature = TableNature {
        is_primary: false,
        contains_all_ids: false,
        sparse: false,
        unique_ids: true,
    };

    pub const ALL_IDS: TableNature = TableNature {
        is_primary: false,
        contains_all_ids: true,
        sparse: false,
        unique_ids: false,
    };

    pub const ALL_IDS_SPARSE: TableNature = TableNature {
        is_primary: false,
        contains_all_ids: true,
        sparse: true,
        unique_ids: false,
    };
}

impl Default for TableNature {
    /// A plain id-subset table: not primary, not known to contain every
    /// id, not sparse, ids not asserted unique.
    fn default() -> Self {
        Self::ID_SUBSET
    }
}
