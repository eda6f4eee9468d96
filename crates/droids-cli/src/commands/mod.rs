pub mod compare;
pub mod resinfo;
