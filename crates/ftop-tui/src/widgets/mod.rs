pub mod bytes_fmt;
