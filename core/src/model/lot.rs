pub const DEFAULT_CAPACITY: u32 = 50;

/// Occupancy of the simulated lot. `occupied` never exceeds `capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParkingLotState {
    occupied: u32,
    capacity: u32,
}

impl ParkingLotState {
    /// Values above `capacity` are clamped.
    pub fn new(occupied: u32, capacity: u32) -> Self {
        Self {
            occupied: occupied.min(capacity),
            capacity,
        }
    }

    pub fn occupied(&self) -> u32 {
        self.occupied
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn available(&self) -> u32 {
        self.capacity - self.occupied
    }

    pub fn is_full(&self) -> bool {
        self.occupied == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Moves one space up or down, reflecting at the bounds.
    /// Returns the signed change actually applied.
    pub fn step(&mut self, towards_full: bool) -> i32 {
        if self.capacity == 0 {
            return 0;
        }
        let up = if self.is_empty() {
            true
        } else if self.is_full() {
            false
        } else {
            towards_full
        };
        if up {
            self.occupied += 1;
            1
        } else {
            self.occupied -= 1;
            -1
        }
    }

    pub fn status_line(&self) -> String {
        format!(
            "Occupied spaces: {} | Available spaces: {}",
            self.occupied,
            self.available()
        )
    }
}
