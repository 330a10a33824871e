mod mailing_list;
mod member;

pub use mailing_list::*;
pub use member::*;
