pub mod change_set;
pub mod outcome;
pub mod policy;
pub mod remote_state;
