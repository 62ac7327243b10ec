mod paging;

pub use paging::*;
