//! Network definition: places, transitions and weighted arcs.
//!
//! Two layers live here:
//! - [`NetworkDefinition`] is plain declarative data (what a config file or a
//!   caller supplies). It can be serialised and carries no invariants.
//! - [`Network`] is the validated, immutable form the engine works with. Arc
//!   endpoints are resolved to place indices once, at construction.
//!
//! # Critical Invariants
//!
//! 1. **Unique identifiers**: place ids and transition ids are unique
//! 2. **Positive weights**: every arc has `weight >= 1`
//! 3. **Non-trivial transitions**: at least one input and one output arc
//! 4. **Distinct arcs**: a transition touches a place with at most one input
//!    arc and at most one output arc
//! 5. **Capacity respected**: initial tokens never exceed a place's capacity

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a [`Network`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Duplicate place id: {0}")]
    DuplicatePlace(String),

    #[error("Duplicate transition id: {0}")]
    DuplicateTransition(String),

    #[error("Transition {transition} references unknown place {place}")]
    UnknownPlace { transition: String, place: String },

    #[error("Transition {transition} has a zero-weight arc on place {place}")]
    ZeroWeight { transition: String, place: String },

    #[error("Transition {0} declares no input arcs")]
    MissingInputs(String),

    #[error("Transition {0} declares no output arcs")]
    MissingOutputs(String),

    #[error("Transition {transition} has more than one {direction} arc on place {place}")]
    DuplicateArc {
        transition: String,
        place: String,
        direction: ArcDirection,
    },

    #[error("Place {place} starts with {tokens} tokens, above its capacity {capacity}")]
    InitialExceedsCapacity {
        place: String,
        tokens: u64,
        capacity: u64,
    },

    #[error("Marking names unknown place {0}")]
    UnknownMarkingPlace(String),

    #[error("Invalid network definition: {0}")]
    Parse(String),
}

// ============================================================================
// Declarative definition
// ============================================================================

fn default_weight() -> u64 {
    1
}

fn arc_definitions(list: &[(&str, u64)]) -> Vec<ArcDefinition> {
    list.iter()
        .map(|(place, weight)| ArcDefinition {
            place: place.to_string(),
            weight: *weight,
        })
        .collect()
}

/// One place as declared by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDefinition {
    pub id: String,

    /// Display label, opaque to the engine
    #[serde(default)]
    pub label: String,

    /// Initial token count
    #[serde(default)]
    pub tokens: u64,

    /// Maximum token count, `None` for unbounded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u64>,
}

/// One arc endpoint as declared on a transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcDefinition {
    pub place: String,
    #[serde(default = "default_weight")]
    pub weight: u64,
}

/// One transition as declared by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionDefinition {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub inputs: Vec<ArcDefinition>,
    pub outputs: Vec<ArcDefinition>,
}

/// Declarative network: what gets loaded from JSON or assembled in code
///
/// # Example
///
/// ```rust
/// use token_flow_core_rs::NetworkDefinition;
///
/// let network = NetworkDefinition::new("relay")
///     .place("IN", "Inbox", 2)
///     .place("OUT", "Outbox", 0)
///     .transition("MOVE", "Move one", &[("IN", 1)], &[("OUT", 1)])
///     .build()
///     .unwrap();
///
/// assert_eq!(network.num_places(), 2);
/// assert_eq!(network.num_transitions(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    #[serde(default)]
    pub name: String,
    pub places: Vec<PlaceDefinition>,
    pub transitions: Vec<TransitionDefinition>,
}

impl NetworkDefinition {
    /// Start an empty definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            places: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Parse a definition from JSON
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        serde_json::from_str(json).map_err(|e| NetworkError::Parse(e.to_string()))
    }

    /// Add an unbounded place
    pub fn place(mut self, id: &str, label: &str, tokens: u64) -> Self {
        self.places.push(PlaceDefinition {
            id: id.to_string(),
            label: label.to_string(),
            tokens,
            capacity: None,
        });
        self
    }

    /// Add a place holding at most `capacity` tokens
    pub fn bounded_place(mut self, id: &str, label: &str, tokens: u64, capacity: u64) -> Self {
        self.places.push(PlaceDefinition {
            id: id.to_string(),
            label: label.to_string(),
            tokens,
            capacity: Some(capacity),
        });
        self
    }

    /// Add a transition; arcs are `(place id, weight)` pairs
    pub fn transition(
        mut self,
        id: &str,
        label: &str,
        inputs: &[(&str, u64)],
        outputs: &[(&str, u64)],
    ) -> Self {
        self.transitions.push(TransitionDefinition {
            id: id.to_string(),
            label: label.to_string(),
            inputs: arc_definitions(inputs),
            outputs: arc_definitions(outputs),
        });
        self
    }

    /// Override the initial token count of an existing place
    ///
    /// Unknown ids are ignored; validation happens in [`NetworkDefinition::build`].
    pub fn with_tokens(mut self, id: &str, tokens: u64) -> Self {
        if let Some(place) = self.places.iter_mut().find(|p| p.id == id) {
            place.tokens = tokens;
        }
        self
    }

    /// Validate and freeze into a [`Network`]
    pub fn build(self) -> Result<Network, NetworkError> {
        Network::from_definition(self)
    }
}

// ============================================================================
// Validated network
// ============================================================================

/// Whether an arc feeds a transition or is fed by it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcDirection {
    Input,
    Output,
}

impl std::fmt::Display for ArcDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArcDirection::Input => write!(f, "input"),
            ArcDirection::Output => write!(f, "output"),
        }
    }
}

/// A place in a validated network
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    id: String,
    label: String,
    initial_tokens: u64,
    capacity: Option<u64>,
}

impl Place {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn initial_tokens(&self) -> u64 {
        self.initial_tokens
    }

    pub fn capacity(&self) -> Option<u64> {
        self.capacity
    }
}

/// A weighted arc with its place resolved to an index
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    place: usize,
    weight: u64,
    direction: ArcDirection,
}

impl Arc {
    /// Index of the place in network order
    pub fn place(&self) -> usize {
        self.place
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn direction(&self) -> ArcDirection {
        self.direction
    }
}

/// Combined effect of one firing on one place
///
/// A place that is both input and output of a transition gets a single
/// effect carrying both weights, so firing applies `produce - consume` once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceEffect {
    pub place: usize,
    pub consume: u64,
    pub produce: u64,
}

/// A transition in a validated network
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    id: String,
    label: String,
    inputs: Vec<Arc>,
    outputs: Vec<Arc>,
    effects: Vec<PlaceEffect>,
}

impl Transition {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Input arcs in declared order
    pub fn inputs(&self) -> &[Arc] {
        &self.inputs
    }

    /// Output arcs in declared order
    pub fn outputs(&self) -> &[Arc] {
        &self.outputs
    }

    /// Per-place net effects, one entry per touched place
    pub fn effects(&self) -> &[PlaceEffect] {
        &self.effects
    }

    /// Sum of input weights (tokens consumed per firing)
    pub fn consumed(&self) -> u64 {
        self.inputs
            .iter()
            .fold(0u64, |total, a| total.saturating_add(a.weight))
    }

    /// Sum of output weights (tokens produced per firing)
    pub fn produced(&self) -> u64 {
        self.outputs
            .iter()
            .fold(0u64, |total, a| total.saturating_add(a.weight))
    }
}

/// Validated, structurally immutable network
///
/// Places and transitions keep their declared order; that order is the
/// order of every marking and of every enabled set.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    name: String,
    places: IndexMap<String, Place>,
    transitions: IndexMap<String, Transition>,
    definition: NetworkDefinition,
}

impl Network {
    /// Validate a definition and resolve all arcs
    pub fn from_definition(definition: NetworkDefinition) -> Result<Self, NetworkError> {
        let mut places = IndexMap::with_capacity(definition.places.len());
        for def in &definition.places {
            if let Some(capacity) = def.capacity {
                if def.tokens > capacity {
                    return Err(NetworkError::InitialExceedsCapacity {
                        place: def.id.clone(),
                        tokens: def.tokens,
                        capacity,
                    });
                }
            }
            let place = Place {
                id: def.id.clone(),
                label: def.label.clone(),
                initial_tokens: def.tokens,
                capacity: def.capacity,
            };
            if places.insert(def.id.clone(), place).is_some() {
                return Err(NetworkError::DuplicatePlace(def.id.clone()));
            }
        }

        let mut transitions = IndexMap::with_capacity(definition.transitions.len());
        for def in &definition.transitions {
            let transition = Self::resolve_transition(def, &places)?;
            if transitions.insert(def.id.clone(), transition).is_some() {
                return Err(NetworkError::DuplicateTransition(def.id.clone()));
            }
        }

        Ok(Self {
            name: definition.name.clone(),
            places,
            transitions,
            definition,
        })
    }

    fn resolve_transition(
        def: &TransitionDefinition,
        places: &IndexMap<String, Place>,
    ) -> Result<Transition, NetworkError> {
        if def.inputs.is_empty() {
            return Err(NetworkError::MissingInputs(def.id.clone()));
        }
        if def.outputs.is_empty() {
            return Err(NetworkError::MissingOutputs(def.id.clone()));
        }

        let resolve = |arcs: &[ArcDefinition],
                       direction: ArcDirection|
         -> Result<Vec<Arc>, NetworkError> {
            let mut resolved: Vec<Arc> = Vec::with_capacity(arcs.len());
            for arc in arcs {
                let place = places.get_index_of(&arc.place).ok_or_else(|| {
                    NetworkError::UnknownPlace {
                        transition: def.id.clone(),
                        place: arc.place.clone(),
                    }
                })?;
                if arc.weight == 0 {
                    return Err(NetworkError::ZeroWeight {
                        transition: def.id.clone(),
                        place: arc.place.clone(),
                    });
                }
                if resolved.iter().any(|a| a.place == place) {
                    return Err(NetworkError::DuplicateArc {
                        transition: def.id.clone(),
                        place: arc.place.clone(),
                        direction,
                    });
                }
                resolved.push(Arc {
                    place,
                    weight: arc.weight,
                    direction,
                });
            }
            Ok(resolved)
        };

        let inputs = resolve(&def.inputs, ArcDirection::Input)?;
        let outputs = resolve(&def.outputs, ArcDirection::Output)?;

        let mut effects: Vec<PlaceEffect> = inputs
            .iter()
            .map(|a| PlaceEffect {
                place: a.place,
                consume: a.weight,
                produce: 0,
            })
            .collect();
        for arc in &outputs {
            match effects.iter_mut().find(|e| e.place == arc.place) {
                Some(effect) => effect.produce = arc.weight,
                None => effects.push(PlaceEffect {
                    place: arc.place,
                    consume: 0,
                    produce: arc.weight,
                }),
            }
        }

        Ok(Transition {
            id: def.id.clone(),
            label: def.label.clone(),
            inputs,
            outputs,
            effects,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition this network was built from
    pub fn definition(&self) -> &NetworkDefinition {
        &self.definition
    }

    pub fn num_places(&self) -> usize {
        self.places.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    pub fn place(&self, id: &str) -> Option<&Place> {
        self.places.get(id)
    }

    pub fn place_at(&self, index: usize) -> Option<&Place> {
        self.places.get_index(index).map(|(_, p)| p)
    }

    pub fn place_index(&self, id: &str) -> Option<usize> {
        self.places.get_index_of(id)
    }

    /// Places in declared order
    pub fn places(&self) -> impl Iterator<Item = &Place> {
        self.places.values()
    }

    pub fn transition(&self, id: &str) -> Option<&Transition> {
        self.transitions.get(id)
    }

    pub fn transition_at(&self, index: usize) -> Option<&Transition> {
        self.transitions.get_index(index).map(|(_, t)| t)
    }

    pub fn transition_index(&self, id: &str) -> Option<usize> {
        self.transitions.get_index_of(id)
    }

    /// Transitions in declared order
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.values()
    }

    pub fn has_transition(&self, id: &str) -> bool {
        self.transitions.contains_key(id)
    }
}
