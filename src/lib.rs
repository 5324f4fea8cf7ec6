//! # bnet-rs: Hash-consed Boolean logic networks in Rust
//!
//! **`bnet-rs`** is the core data structure of a logic synthesis toolkit: a
//! directed acyclic graph of Boolean gates with **complemented edges**,
//! **structural hashing** and **in-place rewriting**.
//!
//! ## Key Features
//!
//! - **Manager-Centric Architecture**: All operations go through the [`Network`][crate::network::Network]. It owns the node storage and the structural hash table, so the same canonical gate is never built twice.
//! - **Complemented Edges**: A [`Signal`][crate::signal::Signal] is a node index plus a negation bit. Inverters cost nothing and never appear as nodes.
//! - **Rich Gate Catalogue**: AND, OR, XOR and their negations, the asymmetric `LT`/`GE`/`GT`/`LE`, MAJ, ITE, XOR3, and arbitrary functions given as a [`TruthTable`][crate::truth_table::TruthTable].
//! - **Rewriting**: Nodes can be substituted network-wide. Fanouts are re-canonicalized, duplicates are merged, and unused logic is freed by reference counting.
//! - **Observers**: External trackers subscribe to node creation, modification and deletion through [`Events`][crate::events::Events].
//!
//! ## Basic Usage
//!
//! ```rust
//! use bnet_rs::network::Network;
//!
//! // 1. Initialize the network
//! let mut ntk = Network::new();
//!
//! // 2. Create primary inputs
//! let a = ntk.create_pi();
//! let b = ntk.create_pi();
//! let c = ntk.create_pi();
//!
//! // 3. Build logic: f = (a & b) | c
//! let ab = ntk.create_and(a, b);
//! let f = ntk.create_or(ab, c);
//! ntk.create_po(f);
//!
//! // Trivial cases never create nodes
//! assert_eq!(ntk.create_and(a, !a), ntk.get_constant(false));
//!
//! // 4. Rewrite: replace `a & b` by `b`
//! ntk.substitute_node(ab.node(), b);
//! assert!(ntk.is_dead(ab.node()));
//! assert_eq!(ntk.fanout_size(b.node()), 1);
//! ```
//!
//! ## Core Components
//!
//! - **[`network`]**: The [`Network`][crate::network::Network] manager, queries and iteration.
//! - **[`construct`]**: Gate constructors and hash-consing.
//! - **[`mutate`]**: Deletion, revival and substitution.
//! - **[`gate`]**: Canonicalization rules of the builtin gates.
//! - **[`sim`]**: Truth-table simulation.

pub mod construct;
pub mod error;
pub mod events;
pub mod function;
pub mod gate;
pub mod integrity;
pub mod mutate;
pub mod network;
pub mod node;
pub mod signal;
pub mod sim;
pub mod strash;
pub mod truth_table;
pub mod types;
