pub mod checker;
pub mod constants;
pub mod fanout;
pub mod notifier;
pub mod prober;
pub mod retry;
