mod memory;
mod record;

pub use memory::InMemoryEntityStore;
pub use record::TimestampedRecord;
