pub mod conflict_once_store;
pub mod recording_tracer;
pub mod scripted_transporter;
