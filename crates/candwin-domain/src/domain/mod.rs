//! Candidate window protocol: outbound command frames and inbound events.

mod batch;
mod command;
mod inbound;

pub use batch::CandidateBatch;
pub use command::CHARSET_FIELD;
pub use command::CandidateCommand;
pub use inbound::CandidateEvent;
pub use inbound::ERROR_SENTINEL;
pub use inbound::INDEX_VERB;
pub use inbound::InboundEvent;
pub use inbound::READ_CHUNK_SIZE;
pub use inbound::decode_chunk;
pub use inbound::parse_chunk;
pub use inbound::parse_lenient_int;
