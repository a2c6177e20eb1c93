pub mod time_fmt;
