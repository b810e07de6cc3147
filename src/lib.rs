//! Step-by-step visualizer for the inorder traversal of small binary trees.
//!
//! The kernel lives in [`domain`]: building the sample or a random tree,
//! laying it out and planning its inorder traversal. [`application`] holds the
//! playback cursor and the session state container, [`cli`] renders a session
//! in the terminal.
//!
//! ```
//! use inorder_viz::domain::{assign_layout, plan_inorder, TreeBuilder};
//!
//! let mut tree = TreeBuilder::build_sample_tree();
//! assign_layout(&mut tree, 300.0, 50.0, 140.0);
//! let values: Vec<i64> = plan_inorder(&tree).iter().map(|s| s.value).collect();
//! assert_eq!(values, vec![4, 2, 5, 1, 6, 3, 7]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
