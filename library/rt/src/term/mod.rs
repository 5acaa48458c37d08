mod float;
mod header;
mod opaque;
mod tuple;

pub use self::float::{load as load_double, store as store_double, DOUBLE_WOSIZE};
pub use self::header::{Header, Tag};
pub use self::opaque::OpaqueTerm;
pub use self::tuple::Tuple;
