//! placedb Core Types and Definitions
//!
//! This crate provides the data model of the placedb placement database.
//! It includes:
//!
//! - **Orientation**: The eight cell orientations and their flips ([`orient::Orient`])
//! - **Geometry**: Integer grid coordinates, sizes and boxes ([`geometry`] module)
//! - **Nodes**: Placeable cells with status and orientation ([`node`] module)
//! - **Rows**: Placement rows and the row index ([`row`] module)
//! - **Nets**: Nets and pins ([`net`] module)
//! - **Database**: The aggregate owning all of the above ([`db`] module)

pub mod db;
pub mod geometry;
pub mod net;
pub mod node;
pub mod orient;
pub mod row;
