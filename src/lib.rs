// Copyright (C) 2017-2019 Oren Ben-Kiki. See the LICENSE.txt
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Replay UPPAAL XTR traces against a compiled model and extract a per-agent timeline.
//!
//! The model is loaded from the intermediate format ([`Model::load`]). A trace is then replayed
//! against it ([`replay`]), giving a sequence of symbolic states and the transitions between them.
//! The transitions are classified into domain events ([`classify`]) of the agents inferred from the
//! process names ([`collect_agents`]), and folded into a timeline ([`aggregate`]) which can be
//! written as a report ([`XmlReport`]).

mod agents;
mod claps;
mod configurations;
mod errors;
mod events;
mod intermediate;
mod models;
mod reports;
mod scanner;
mod states;
mod timelines;
mod traces;
mod transitions;
mod utilities;

pub use crate::agents::*;
pub use crate::claps::*;
pub use crate::configurations::*;
pub use crate::errors::*;
pub use crate::events::*;
pub use crate::models::*;
pub use crate::reports::*;
pub use crate::scanner::*;
pub use crate::states::*;
pub use crate::timelines::*;
pub use crate::traces::*;
pub use crate::transitions::*;
pub use crate::utilities::*;
