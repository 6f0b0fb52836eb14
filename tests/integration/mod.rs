mod concurrent_approval;
mod registry;
mod rejection;
