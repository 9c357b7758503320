pub mod book;
pub mod lookup;
pub mod reading_note;
pub mod vocab;
