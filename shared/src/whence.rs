/// Reference point for [`seek`](crate) offsets, mirroring POSIX `lseek`'s
/// `SEEK_SET` / `SEEK_CUR` / `SEEK_END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whence {
    Start,
    Current,
    End,
}
