// path constants
pub const PATH_SEPARATOR: &str = "/";
pub const FIELD_SEPARATOR: &str = ".";

// wire constants
pub const TYPE_TAG: &str = "__type__";
pub const TAG_DOC: &str = "doc";
pub const TAG_REF: &str = "ref";
pub const TAG_COLLECTION: &str = "collection";
pub const TAG_TIMESTAMP: &str = "timestamp";
pub const TAG_VALUE: &str = "value";
pub const KEY_REF: &str = "ref";
pub const KEY_DATA: &str = "data";
pub const KEY_COLLECTION: &str = "collection";
pub const KEY_PATH: &str = "path";
pub const KEY_ID: &str = "id";
pub const KEY_VALUE: &str = "value";
pub const KEY_OP: &str = "op";
pub const KEY_ARGS: &str = "args";

// server operation names
pub const OP_SERVER_DATE: &str = "serverDate";
pub const OP_INCREMENT: &str = "increment";
pub const OP_ARRAY_UNION: &str = "arrayUnion";
pub const OP_ARRAY_REMOVE: &str = "arrayRemove";

// store constants
pub const AUTO_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
pub const DEFAULT_AUTO_ID_LENGTH: usize = 20;
