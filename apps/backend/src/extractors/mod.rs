pub mod include;
pub mod resource_id;
pub mod validated_json;

pub use include::IncludeQuery;
pub use resource_id::ResourceId;
pub use validated_json::{BodyLimit, ValidatedJson, DEFAULT_BODY_LIMIT};
