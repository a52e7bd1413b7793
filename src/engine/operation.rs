use super::error::ConfigError;

/// How a run treats the values its operation returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Values are discarded; side effects run in no particular order
    IgnoreResult,
    /// Values are handed to a sequential consumer in input order
    OrderPreserving,
}

/// Every named sequence operation that can run on worker threads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Each,
    EachWithIndex,
    ReverseEach,
    EachSlice,
    EachCons,
    Zip,
    Cycle,
    All,
    Any,
    NoneOf,
    One,
    Find,
    Position,
    TakeWhile,
    DropWhile,
    Partition,
    Filter,
    Reject,
    Count,
    Map,
    /// Map only the elements a pattern selects
    MapMatching,
    /// Map only the elements a pattern does not select
    MapRejecting,
    FilterMap,
    FlatMap,
    GroupBy,
    MaxByKey,
    MinByKey,
    MinMaxByKey,
    SortByKey,
    Sum,
    UniqueBy,
}

/// Name lookup table; the first entry of each operation is its canonical name
pub const OPERATIONS: &[(&str, Operation)] = &[
    ("each", Operation::Each),
    ("each_entry", Operation::Each),
    ("each_with_index", Operation::EachWithIndex),
    ("reverse_each", Operation::ReverseEach),
    ("each_slice", Operation::EachSlice),
    ("each_cons", Operation::EachCons),
    ("zip", Operation::Zip),
    ("cycle", Operation::Cycle),
    ("all", Operation::All),
    ("any", Operation::Any),
    ("none", Operation::NoneOf),
    ("one", Operation::One),
    ("find", Operation::Find),
    ("detect", Operation::Find),
    ("position", Operation::Position),
    ("find_index", Operation::Position),
    ("take_while", Operation::TakeWhile),
    ("drop_while", Operation::DropWhile),
    ("partition", Operation::Partition),
    ("filter", Operation::Filter),
    ("select", Operation::Filter),
    ("reject", Operation::Reject),
    ("count", Operation::Count),
    ("map", Operation::Map),
    ("collect", Operation::Map),
    ("map_matching", Operation::MapMatching),
    ("grep", Operation::MapMatching),
    ("map_rejecting", Operation::MapRejecting),
    ("grep_v", Operation::MapRejecting),
    ("filter_map", Operation::FilterMap),
    ("flat_map", Operation::FlatMap),
    ("group_by", Operation::GroupBy),
    ("max_by_key", Operation::MaxByKey),
    ("min_by_key", Operation::MinByKey),
    ("minmax_by_key", Operation::MinMaxByKey),
    ("sort_by_key", Operation::SortByKey),
    ("sum", Operation::Sum),
    ("unique_by", Operation::UniqueBy),
];

/// Operations whose per-element work depends on earlier results
pub const SEQUENTIAL_ONLY: &[&str] = &[
    "fold", "reduce", "scan", "max", "min", "minmax", "sort", "first", "last", "take", "skip",
    "contains", "chunk_by", "each_with_object", "to_vec",
];

impl Operation {
    /// Resolve an operation by name
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        if let Some((_, operation)) = OPERATIONS.iter().find(|(known, _)| *known == name) {
            return Ok(*operation);
        }
        if SEQUENTIAL_ONLY.contains(&name) {
            return Err(ConfigError::SequentialOnly(name.to_string()));
        }
        Err(ConfigError::UnknownOperation(name.to_string()))
    }

    pub fn name(self) -> &'static str {
        OPERATIONS
            .iter()
            .find(|(_, operation)| *operation == self)
            .map(|(name, _)| *name)
            .unwrap_or("unnamed")
    }

    pub fn mode(self) -> Mode {
        match self {
            Operation::Each
            | Operation::EachWithIndex
            | Operation::ReverseEach
            | Operation::EachSlice
            | Operation::EachCons
            | Operation::Zip
            | Operation::Cycle => Mode::IgnoreResult,
            Operation::All
            | Operation::Any
            | Operation::NoneOf
            | Operation::One
            | Operation::Find
            | Operation::Position
            | Operation::TakeWhile
            | Operation::DropWhile
            | Operation::Partition
            | Operation::Filter
            | Operation::Reject
            | Operation::Count
            | Operation::Map
            | Operation::MapMatching
            | Operation::MapRejecting
            | Operation::FilterMap
            | Operation::FlatMap
            | Operation::GroupBy
            | Operation::MaxByKey
            | Operation::MinByKey
            | Operation::MinMaxByKey
            | Operation::SortByKey
            | Operation::Sum
            | Operation::UniqueBy => Mode::OrderPreserving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn canonical_names_round_trip() {
        let operations: HashSet<Operation> = OPERATIONS.iter().map(|(_, op)| *op).collect();
        assert_eq!(operations.len(), 31);
        for operation in operations {
            assert_eq!(Operation::from_name(operation.name()), Ok(operation));
        }
    }

    #[test]
    fn aliases_resolve_to_same_operation() {
        assert_eq!(Operation::from_name("select"), Ok(Operation::Filter));
        assert_eq!(Operation::from_name("collect"), Ok(Operation::Map));
        assert_eq!(Operation::from_name("detect"), Ok(Operation::Find));
        assert_eq!(Operation::from_name("each_entry"), Ok(Operation::Each));
        assert_eq!(Operation::from_name("grep"), Ok(Operation::MapMatching));
        assert_eq!(Operation::from_name("grep_v"), Ok(Operation::MapRejecting));
        assert_eq!(Operation::MapMatching.name(), "map_matching");
        assert_eq!(Operation::Filter.name(), "filter");
    }

    #[test]
    fn side_effect_operations_ignore_results() {
        assert_eq!(Operation::Each.mode(), Mode::IgnoreResult);
        assert_eq!(Operation::Cycle.mode(), Mode::IgnoreResult);
        assert_eq!(Operation::Zip.mode(), Mode::IgnoreResult);
    }

    #[test]
    fn predicates_and_transforms_preserve_order() {
        assert_eq!(Operation::All.mode(), Mode::OrderPreserving);
        assert_eq!(Operation::Find.mode(), Mode::OrderPreserving);
        assert_eq!(Operation::Map.mode(), Mode::OrderPreserving);
        assert_eq!(Operation::MapRejecting.mode(), Mode::OrderPreserving);
        assert_eq!(Operation::SortByKey.mode(), Mode::OrderPreserving);
    }

    #[test]
    fn sequential_only_names_are_rejected() {
        assert_eq!(
            Operation::from_name("fold"),
            Err(ConfigError::SequentialOnly("fold".to_string()))
        );
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            Operation::from_name("frobnicate"),
            Err(ConfigError::UnknownOperation("frobnicate".to_string()))
        );
    }

    #[test]
    fn no_name_is_both_parallel_and_sequential() {
        for name in SEQUENTIAL_ONLY {
            assert!(!OPERATIONS.iter().any(|(known, _)| known == name));
        }
    }
}
