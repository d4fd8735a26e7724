//! Label list being built for one position during one tier.

use super::FeatureLabel;

/// Labels accumulated for one terrain position.
///
/// A generator may queue secondary labels while it runs; they are only
/// recorded if the generator commits its own label, and they land right after
/// it so the primary label always precedes its secondaries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureAccumulator {
    labels: Vec<FeatureLabel>,
    pending: Vec<FeatureLabel>,
}

impl FeatureAccumulator {
    /// Start from the labels already stored on a record.
    pub fn new(labels: Vec<FeatureLabel>) -> Self {
        Self {
            labels,
            pending: Vec::new(),
        }
    }

    /// Labels committed so far, in application order.
    pub fn existing(&self) -> &[FeatureLabel] {
        &self.labels
    }

    /// Queue a secondary label for the generator currently running.
    pub fn push_secondary(&mut self, label: FeatureLabel) {
        if !self.pending.contains(&label) {
            self.pending.push(label);
        }
    }

    /// Record `primary` followed by any queued secondaries. Labels already
    /// present are not duplicated.
    pub fn commit(&mut self, primary: FeatureLabel) {
        if !self.labels.contains(&primary) {
            self.labels.push(primary);
        }
        for label in self.pending.drain(..) {
            if !self.labels.contains(&label) {
                self.labels.push(label);
            }
        }
    }

    /// Finish, returning the committed labels.
    pub fn into_labels(self) -> Vec<FeatureLabel> {
        self.labels
    }
}
