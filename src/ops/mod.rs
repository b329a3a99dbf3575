pub mod agenda_ops;
pub mod check;
pub mod index;
pub mod line_ops;
pub mod priority;
pub mod recurrence;
