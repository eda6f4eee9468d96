use std::fmt;

/// One of the three simulated protein states compared in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum State {
    /// Baseline state (e.g. wild-type or unbound).
    Reference,
    /// Experimental state (e.g. mutant or bound).
    Query,
    /// Independent replicate of the baseline, used to build neutral distributions.
    ReferenceControl,
}

impl State {
    pub const ALL: [State; 3] = [State::Reference, State::Query, State::ReferenceControl];

    /// Token used in toolkit output file names (`fluct_<ID>_all_<tag>.txt`).
    pub fn file_tag(&self) -> &'static str {
        match self {
            State::Reference => "reference",
            State::Query => "query",
            State::ReferenceControl => "referenceCTL",
        }
    }

    /// Short token used in directory names (`atomflux_<tag>`, `feature_sub_<tag>_reduced`).
    pub fn short_tag(&self) -> &'static str {
        match self {
            State::Reference => "ref",
            State::Query => "query",
            State::ReferenceControl => "refCTL",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::Reference => "reference",
            State::Query => "query",
            State::ReferenceControl => "reference-control",
        };
        f.write_str(name)
    }
}

/// Sampling scope of a derived value: the whole trajectory or one subsample of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scope {
    Whole,
    Subsample(usize),
}

impl Scope {
    pub fn file_tag(&self) -> &'static str {
        match self {
            Scope::Whole => "all",
            Scope::Subsample(_) => "sub",
        }
    }

    pub fn sample_index(&self) -> Option<usize> {
        match self {
            Scope::Whole => None,
            Scope::Subsample(i) => Some(*i),
        }
    }

    /// The whole-run scope followed by `subsamples` subsample scopes.
    pub fn all(subsamples: usize) -> impl Iterator<Item = Scope> {
        std::iter::once(Scope::Whole).chain((0..subsamples).map(Scope::Subsample))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Whole => f.write_str("whole run"),
            Scope::Subsample(i) => write!(f, "subsample {}", i),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey {
    pub state: State,
    pub scope: Scope,
}

impl FeatureKey {
    pub fn new(state: State, scope: Scope) -> Self {
        Self { state, scope }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.state, self.scope)
    }
}
