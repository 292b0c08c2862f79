// ─── Packdev Core ───
// Component resolution and instance assembly for modpacks.
//
// Architecture:
//   core/
//     meta/      — Descriptor model, metadata source, dependency resolver
//     loaders/   — Supported loader table + seed sets
//     instance/  — Pack manifest + instance folder writer
//     state/     — Settings + application state

pub mod error;
pub mod http;
pub mod instance;
pub mod loaders;
pub mod meta;
pub mod state;
