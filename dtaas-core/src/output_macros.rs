//! Output macros for the DTaaS CLI.
//!
//! User-facing output goes through these macros so it stays on
//! stdout/stderr and is never swallowed by the tracing pipeline.

#[macro_export]
macro_rules! dtaas_print {
    ($($arg:tt)*) => {
        print!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! dtaas_println {
    () => {
        println!();
    };
    ($($arg:tt)*) => {
        println!("{}", format!($($arg)*));
    }
}

#[macro_export]
macro_rules! dtaas_error {
    ($($arg:tt)*) => {
        eprintln!("{}", format!($($arg)*));
    }
}
