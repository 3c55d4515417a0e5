use crate::Position;

/// Ordered sequence of positions, one per frame. The index is the frame index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    positions: Vec<Position>,
}

impl Trajectory {
    pub fn new(positions: Vec<Position>) -> Self {
        Trajectory { positions }
    }

    pub fn push(&mut self, position: Position) {
        self.positions.push(position);
    }

    pub fn get(&self, index: usize) -> Option<&Position> {
        self.positions.get(index)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn truncate(&mut self, len: usize) {
        self.positions.truncate(len);
    }

    /// Consecutive frame pairs `(i, positions[i - 1], positions[i])` for `i` in `1..len`.
    pub fn steps(&self) -> StepIterator<'_> {
        StepIterator::new(self)
    }
}

impl FromIterator<Position> for Trajectory {
    fn from_iter<T: IntoIterator<Item = Position>>(iter: T) -> Self {
        Trajectory::new(iter.into_iter().collect())
    }
}

pub struct StepIterator<'a> {
    current: usize,
    trajectory: &'a Trajectory,
}

impl<'a> StepIterator<'a> {
    pub fn new(trajectory: &'a Trajectory) -> Self {
        StepIterator {
            current: 1,
            trajectory,
        }
    }
}

impl<'a> Iterator for StepIterator<'a> {
    type Item = (usize, &'a Position, &'a Position);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.current;
        let previous = self.trajectory.get(index.checked_sub(1)?)?;
        let current = self.trajectory.get(index)?;
        self.current += 1;
        Some((index, previous, current))
    }
}

/// Cuts both trajectories down to the shorter length so they can be compared index by index.
/// Returns the common length.
pub fn truncate_to_common_length(a: &mut Trajectory, b: &mut Trajectory) -> usize {
    let len = a.len().min(b.len());
    a.truncate(len);
    b.truncate(len);
    len
}
