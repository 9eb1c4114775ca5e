//! Generation core: normalize → train → sample → sanitize.

pub mod corpus;
pub mod markov;
pub mod pipeline;
pub mod sanitize;
