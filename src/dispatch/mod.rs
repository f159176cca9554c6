//! Dispatch side of the router: the [`Logger`], timestamp resolution and the
//! bounded formatting buffer behind [`Logger::log_fmt`].

mod clock;
mod format;
mod logger;

pub use clock::TimestampFn;
pub use format::FORMAT_CAPACITY;
pub use logger::Logger;
