//! TestRail MCP server library.
//!
//! Exposes a TestRail installation over the Model Context Protocol:
//! tools for reading and writing test-management entities, resources for
//! the project and user listings, and prompts for test authoring and run
//! summaries. The interesting core is the dispatch router in [`mcp`],
//! which maps loosely-typed MCP requests onto the typed facade in
//! [`client`].

pub mod client;
pub mod config;
pub mod mcp;
pub mod models;
