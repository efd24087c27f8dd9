// SPDX-License-Identifier: MIT OR Apache-2.0

mod cached;
mod non_cached;

pub use cached::CachedStore;
pub use non_cached::NonCachedStore;
