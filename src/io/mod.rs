/*!
# IO utilities

Record loading (JSON Lines or JSON array) and projected entry saving (JSON Lines).
!*/
pub mod reader;
pub mod writer;
