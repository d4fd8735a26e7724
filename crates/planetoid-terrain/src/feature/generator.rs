//! Feature generator evaluation and the ordered, toggleable generator set.

use glam::DVec3;

use super::{FeatureAccumulator, FeatureKind, FeatureLabel, FeatureRule};
use crate::{BiomeKind, BiomeParams, NoiseSource, TerrainError};

/// Salt offsets of the valley generator's secondary-label channels.
const RIVER_SALT: f64 = 101.0;
const TRIBUTARY_SALT: f64 = 202.0;
const RIVER_THRESHOLD: f64 = 0.5;
const TRIBUTARY_THRESHOLD: f64 = 0.6;
/// A river ending this close above the water level gets a mouth.
const MOUTH_MARGIN: f64 = 0.004;

/// Read-only state a generator sees for one position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureContext {
    /// Position on the unit sphere.
    pub point: DVec3,
    /// Height accumulated so far, including earlier generators of this tier.
    pub height: f64,
    /// Temperature from before this tier's feature pass.
    pub temperature: f64,
    /// Biome the position was classified into for this tier.
    pub biome: BiomeKind,
    /// Configured water level.
    pub water_level: f64,
}

/// Result of one generator evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureOutcome {
    /// Height change, as a fraction of the radius.
    pub delta: f64,
    /// The generator's own label, when it applied.
    pub label: Option<FeatureLabel>,
}

impl FeatureOutcome {
    /// No change and no label.
    pub const NONE: Self = Self {
        delta: 0.0,
        label: None,
    };
}

/// One feature generator: a kind plus its fixed rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureGenerator {
    kind: FeatureKind,
    rule: FeatureRule,
}

impl FeatureGenerator {
    /// The generator for a kind.
    pub fn new(kind: FeatureKind) -> Self {
        Self {
            kind,
            rule: kind.rule(),
        }
    }

    /// Generator kind.
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    /// Identity name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Generation rule.
    pub fn rule(&self) -> &FeatureRule {
        &self.rule
    }

    /// Every existing label is on the allow list.
    pub fn can_apply_with(&self, existing: &[FeatureLabel]) -> bool {
        existing
            .iter()
            .all(|label| self.rule.allowed_with.contains(label))
    }

    /// No existing label is on the prohibited list.
    pub fn can_apply_without(&self, existing: &[FeatureLabel]) -> bool {
        !existing
            .iter()
            .any(|label| self.rule.prohibited_with.contains(label))
    }

    /// Evaluate the generator at one position.
    ///
    /// On success the generator's label (and, for valleys, any river labels)
    /// is committed to `features`. Refusal leaves `features` untouched and
    /// returns [`FeatureOutcome::NONE`].
    pub fn apply(
        &self,
        noise: &NoiseSource,
        ctx: &FeatureContext,
        features: &mut FeatureAccumulator,
        biome: &BiomeParams,
    ) -> FeatureOutcome {
        let existing = features.existing();
        if !self.can_apply_with(existing) || !self.can_apply_without(existing) {
            return FeatureOutcome::NONE;
        }
        if !self.environment_allows(ctx, existing) {
            return FeatureOutcome::NONE;
        }

        let modifier = biome.modifier(self.kind);
        if modifier <= 0.0 {
            return FeatureOutcome::NONE;
        }
        let threshold = self.rule.threshold / modifier;
        if threshold >= 1.0 {
            return FeatureOutcome::NONE;
        }

        let value = noise.sample01(ctx.point, self.rule.frequency, self.rule.salt);
        if value <= threshold {
            return FeatureOutcome::NONE;
        }

        let strength = ((value - threshold) / (1.0 - threshold)).clamp(0.0, 1.0);
        let delta = self.shape(strength) * self.rule.amplitude;

        if self.kind == FeatureKind::Valley {
            self.queue_river_labels(noise, ctx, delta, features);
        }

        let label = FeatureLabel::Feature(self.kind);
        features.commit(label);
        FeatureOutcome {
            delta,
            label: Some(label),
        }
    }

    /// Climate and elevation preconditions beyond the label rules.
    fn environment_allows(&self, ctx: &FeatureContext, existing: &[FeatureLabel]) -> bool {
        let above_water = ctx.height - ctx.water_level;
        match self.kind {
            FeatureKind::Dune => ctx.temperature > 15.0,
            FeatureKind::Fjord => ctx.temperature < 5.0,
            FeatureKind::Glacier => ctx.temperature < 0.0,
            FeatureKind::Lake => above_water < 0.015,
            FeatureKind::Reef => {
                existing.contains(&FeatureLabel::Underwater) && ctx.temperature > 10.0
            }
            FeatureKind::Wetland => ctx.temperature > 0.0 && above_water < 0.02,
            _ => true,
        }
    }

    /// Signed profile in `[-1, 1]` for a strength in `[0, 1]`.
    fn shape(&self, s: f64) -> f64 {
        match self.kind {
            FeatureKind::Crater => -(s * (2.0 - s)),
            FeatureKind::Canyon => -libm::sqrt(s),
            FeatureKind::Fjord | FeatureKind::Karst | FeatureKind::Wetland => -s,
            FeatureKind::Lake => -smoothstep((s * 2.0).min(1.0)),
            FeatureKind::Valley => -smoothstep(s),
            FeatureKind::Mountain => smoothstep(s),
            FeatureKind::Volcano => s * s,
            FeatureKind::Plateau => (s * 2.0).min(1.0),
            FeatureKind::Mesa => smoothstep((s * 3.0).min(1.0)),
            FeatureKind::Dune => s * (0.5 + 0.5 * libm::sin(s * 12.0)),
            FeatureKind::Geyser
            | FeatureKind::Glacier
            | FeatureKind::Hills
            | FeatureKind::Reef
            | FeatureKind::TectonicPlate => s,
        }
    }

    /// Valley side effect: queue river, tributary and mouth labels. They are
    /// recorded only together with the valley label itself.
    fn queue_river_labels(
        &self,
        noise: &NoiseSource,
        ctx: &FeatureContext,
        delta: f64,
        features: &mut FeatureAccumulator,
    ) {
        let river = noise.sample01(ctx.point, self.rule.frequency, self.rule.salt + RIVER_SALT);
        if river <= RIVER_THRESHOLD {
            return;
        }
        features.push_secondary(FeatureLabel::River);

        let tributary = noise.sample01(
            ctx.point,
            self.rule.frequency * 2.0,
            self.rule.salt + TRIBUTARY_SALT,
        );
        if tributary > TRIBUTARY_THRESHOLD {
            features.push_secondary(FeatureLabel::Tributary);
        }
        if ctx.height + delta < ctx.water_level + MOUTH_MARGIN {
            features.push_secondary(FeatureLabel::Mouth);
        }
    }
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// All generators in evaluation order, each with an enable flag.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureSet {
    generators: Vec<(FeatureGenerator, bool)>,
}

impl FeatureSet {
    /// Every generator, enabled, sorted by name.
    pub fn new() -> Self {
        let mut generators: Vec<_> = FeatureKind::ALL
            .into_iter()
            .map(|kind| (FeatureGenerator::new(kind), true))
            .collect();
        generators.sort_by_key(|(g, _)| g.name());
        Self { generators }
    }

    /// Every generator except the named ones.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::UnknownFeature`] for a name matching no generator.
    pub fn with_disabled<S: AsRef<str>>(names: &[S]) -> Result<Self, TerrainError> {
        let mut set = Self::new();
        for name in names {
            let name = name.as_ref();
            let kind = FeatureKind::from_name(name)
                .ok_or_else(|| TerrainError::UnknownFeature(name.to_string()))?;
            set.set_enabled(kind, false);
        }
        Ok(set)
    }

    /// Enable or disable one generator.
    pub fn set_enabled(&mut self, kind: FeatureKind, enabled: bool) {
        for (generator, flag) in &mut self.generators {
            if generator.kind() == kind {
                *flag = enabled;
            }
        }
    }

    /// Whether a generator is enabled.
    pub fn is_enabled(&self, kind: FeatureKind) -> bool {
        self.generators
            .iter()
            .any(|(g, enabled)| g.kind() == kind && *enabled)
    }

    /// Enabled generators that run in `tier`, in name order.
    ///
    /// Generators whose tier lies beyond `finest_tier` run in the finest tier
    /// so shorter schedules still apply every feature.
    pub fn for_tier(&self, tier: u8, finest_tier: u8) -> impl Iterator<Item = &FeatureGenerator> {
        self.generators.iter().filter_map(move |(g, enabled)| {
            (*enabled && g.rule().tier.min(finest_tier) == tier).then_some(g)
        })
    }

    /// Every generator, enabled or not, in name order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureGenerator> {
        self.generators.iter().map(|(g, _)| g)
    }

    /// Sum of all generator amplitudes; bounds the total feature height.
    pub fn total_amplitude(&self) -> f64 {
        self.iter().map(|g| g.rule().amplitude).sum()
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self::new()
    }
}
