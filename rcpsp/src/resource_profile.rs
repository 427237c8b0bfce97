use crate::error::{IndexKind, RangeError};
use crate::instance::Instance;

/// Consumption of every resource at every time step of a fixed horizon.
///
/// This is a plain accumulator: adding a footprint never checks capacities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceProfile {
    horizon: usize,
    usage: Vec<Vec<usize>>,
}

impl ResourceProfile {
    pub fn new(number_of_resources: usize, horizon: usize) -> Self {
        Self {
            horizon,
            usage: vec![vec![0; horizon]; number_of_resources],
        }
    }

    /// Profile sized to `instance.horizon()`.
    pub fn for_instance(instance: &Instance) -> Self {
        Self::new(instance.nb_resources(), instance.horizon())
    }

    pub fn nb_resources(&self) -> usize {
        self.usage.len()
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn usage(&self, resource: usize, time: usize) -> Result<usize, RangeError> {
        let row = self.row(resource)?;
        RangeError::check(IndexKind::Time, time, self.horizon)?;
        Ok(row[time])
    }

    pub fn row(&self, resource: usize) -> Result<&[usize], RangeError> {
        RangeError::check(IndexKind::Resource, resource, self.usage.len())?;
        Ok(&self.usage[resource])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.usage.iter().map(Vec::as_slice)
    }

    /// Adds the consumption of `activity` over `[start, start + duration)`.
    pub fn add_footprint(
        &mut self,
        instance: &Instance,
        activity: usize,
        start: usize,
    ) -> Result<(), RangeError> {
        let end = self.footprint_end(instance, activity, start)?;

        for (row, requirement) in self.usage.iter_mut().zip(instance.requirements(activity)) {
            for cell in &mut row[start..end] {
                *cell += requirement;
            }
        }

        Ok(())
    }

    /// Reverts a previous `add_footprint(instance, activity, start)`.
    pub fn remove_footprint(
        &mut self,
        instance: &Instance,
        activity: usize,
        start: usize,
    ) -> Result<(), RangeError> {
        let end = self.footprint_end(instance, activity, start)?;

        for (row, requirement) in self.usage.iter_mut().zip(instance.requirements(activity)) {
            for cell in &mut row[start..end] {
                debug_assert!(
                    *cell >= requirement,
                    "removing activity {activity} at {start} drives the profile below zero"
                );
                *cell -= requirement;
            }
        }

        Ok(())
    }

    pub fn reset(&mut self) {
        for row in &mut self.usage {
            row.fill(0);
        }
    }

    /// End of the footprint of `activity` placed at `start`, if it stays
    /// inside the horizon.
    pub(crate) fn footprint_end(
        &self,
        instance: &Instance,
        activity: usize,
        start: usize,
    ) -> Result<usize, RangeError> {
        let duration = instance.duration(activity)?;

        match start.checked_add(duration) {
            Some(end) if end <= self.horizon => Ok(end),
            end => Err(RangeError {
                kind: IndexKind::Time,
                index: end.map_or(start, |end| end.saturating_sub(1).max(start)),
                bound: self.horizon,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceProfile;
    use crate::error::IndexKind;
    use crate::instance::tests::three_activities;

    #[test]
    fn sized_to_horizon() {
        let instance = three_activities();
        let profile = ResourceProfile::for_instance(&instance);

        assert_eq!(profile.nb_resources(), 1);
        assert_eq!(profile.horizon(), 6);
        assert_eq!(profile.row(0).unwrap(), &[0; 6]);
    }

    #[test]
    fn add_and_remove_footprint() {
        let instance = three_activities();
        let mut profile = ResourceProfile::for_instance(&instance);

        profile.add_footprint(&instance, 1, 1).unwrap();
        profile.add_footprint(&instance, 2, 3).unwrap();
        assert_eq!(profile.row(0).unwrap(), &[0, 1, 1, 3, 0, 0]);

        profile.remove_footprint(&instance, 1, 1).unwrap();
        assert_eq!(profile.row(0).unwrap(), &[0, 0, 0, 2, 0, 0]);
    }

    #[test]
    fn accumulates_past_capacity() {
        let instance = three_activities();
        let mut profile = ResourceProfile::for_instance(&instance);

        profile.add_footprint(&instance, 2, 0).unwrap();
        profile.add_footprint(&instance, 2, 0).unwrap();

        assert_eq!(profile.usage(0, 0).unwrap(), 4);
    }

    #[test]
    fn footprint_outside_horizon() {
        let instance = three_activities();
        let mut profile = ResourceProfile::for_instance(&instance);

        let err = profile.add_footprint(&instance, 1, 4).unwrap_err();
        assert_eq!(err.kind, IndexKind::Time);
        assert_eq!(err.index, 6);
        assert_eq!(err.bound, 6);
        assert_eq!(profile.row(0).unwrap(), &[0; 6]);

        assert_eq!(
            profile.add_footprint(&instance, 3, 0).unwrap_err().kind,
            IndexKind::Activity
        );
    }

    #[test]
    fn footprint_end_does_not_overflow() {
        let instance = three_activities();
        let mut profile = ResourceProfile::for_instance(&instance);

        let err = profile.add_footprint(&instance, 1, usize::MAX).unwrap_err();
        assert_eq!(err.kind, IndexKind::Time);
        assert_eq!(err.index, usize::MAX);
        assert_eq!(err.bound, 6);

        let removed = profile.remove_footprint(&instance, 1, usize::MAX - 1);
        assert!(removed.is_err());
        assert_eq!(profile.row(0).unwrap(), &[0; 6]);
    }

    #[test]
    fn bounds_checked_reads() {
        let profile = ResourceProfile::new(2, 3);

        assert_eq!(profile.usage(2, 0).unwrap_err().kind, IndexKind::Resource);
        assert_eq!(profile.usage(1, 3).unwrap_err().kind, IndexKind::Time);
        assert!(profile.row(5).is_err());
    }

    #[test]
    fn reset_zeroes_all_cells() {
        let instance = three_activities();
        let mut profile = ResourceProfile::for_instance(&instance);
        profile.add_footprint(&instance, 0, 0).unwrap();
        profile.add_footprint(&instance, 1, 3).unwrap();

        profile.reset();

        assert_eq!(profile, ResourceProfile::for_instance(&instance));
    }
}
