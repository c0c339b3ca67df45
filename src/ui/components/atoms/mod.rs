mod spinner;

pub use spinner::spinner_char;
