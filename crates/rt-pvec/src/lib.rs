//! The persistent vector: the single growable, forkable array
//! representation every ordered container in this workspace is ultimately
//! built from (§4.3, §5).
//!
//! A [`PvRef`] is a `(handle, length)` pair. Reads go through an
//! optimistic protocol that never blocks a writer and never hands back a
//! torn snapshot; writes either land in place (append extends the live
//! segment, set logs the prior value before overwriting) or, when a race
//! or a capacity ceiling gets in the way, fork onto a fresh block and the
//! two references diverge from there — this is the same trade every
//! persistent data structure in the runtime makes: readers are wait-free,
//! writers are lock-free in the uncontended case and degrade to an
//! allocation under contention, never to a blocked thread.

mod block;
mod handle;

pub use handle::PvRef;
