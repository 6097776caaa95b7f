//! Constants used throughout the electrum-store library.
//!
//! This module provides central definitions for the reserved identifiers and
//! property names that the store and the reconciliation engine agree on.

/// Identifier of the root node of every store.
pub const ROOT_ID: &str = "";

/// Separator between the segments of a path identifier.
pub const SEPARATOR: char = '.';

/// Property name holding a node's direct value.
///
/// Also the default key used by collection reconciliation.
pub const DEFAULT_KEY: &str = "";

/// Part name that resolves to the node it is used on.
pub const WILDCARD: &str = "*";

/// Marker introducing the arity suffix of a leaf segment (`name$2`).
pub const ARITY_MARKER: char = '$';

/// Largest integer that survives a round trip through a JSON number.
pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

/// Directive key switching an object into flat-property mode.
pub const APPLY_DIRECTIVE: &str = "$apply";

/// Directive value requesting flat-property mode.
pub const APPLY_PROPS: &str = "props";

/// Key that re-enters the collection branch while in flat-property mode.
pub const ARRAY_KEY: &str = "array";

/// Collection element position.
pub const OFFSET_KEY: &str = "offset";

/// Collection element identifier.
pub const ID_KEY: &str = "id";

/// Collection element scalar payload.
pub const VALUE_KEY: &str = "value";

/// Collection element structured payload, kept verbatim.
pub const POJO_KEY: &str = "pojo";
