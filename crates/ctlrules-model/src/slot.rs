//! Fixed-capacity slot tables.
//!
//! A table is created with its final capacity and never grows. Slot `n`
//! (1-based) keeps its number for the life of the document; deleting an entry
//! frees the slot and a later allocation may occupy it again.

use crate::error::ConfigError;

/// Content of one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<T> {
    Free,
    Occupied(T),
}

impl<T> Slot<T> {
    #[must_use]
    pub fn is_free(&self) -> bool {
        matches!(self, Self::Free)
    }

    #[must_use]
    pub fn occupied(&self) -> Option<&T> {
        match self {
            Self::Occupied(payload) => Some(payload),
            Self::Free => None,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry<T> {
    slot: Slot<T>,
    // Stale payload of a free slot as delivered by the controller. Only
    // re-emitted on encode so untouched documents round-trip.
    residue: Option<T>,
}

/// Bounded table of slots numbered `1..=capacity`.
#[derive(Debug, Clone)]
pub struct SlotTable<T> {
    label: &'static str,
    entries: Vec<Entry<T>>,
}

impl<T> SlotTable<T> {
    /// Table of `capacity` free slots. `label` names the table in errors.
    #[must_use]
    pub fn new(label: &'static str, capacity: usize) -> Self {
        let entries = (0..capacity)
            .map(|_| Entry {
                slot: Slot::Free,
                residue: None,
            })
            .collect();
        Self { label, entries }
    }

    /// Rebuild a table from numbered records. Capacity is the record count;
    /// every number must be unique and within `1..=capacity`.
    pub(crate) fn from_records(
        label: &'static str,
        records: Vec<(u16, Slot<T>, Option<T>)>,
    ) -> Result<Self, ConfigError> {
        let capacity = records.len();
        let mut placed: Vec<Option<Entry<T>>> = (0..capacity).map(|_| None).collect();
        for (number, slot, residue) in records {
            let index = usize::from(number)
                .checked_sub(1)
                .filter(|index| *index < capacity)
                .ok_or_else(|| {
                    ConfigError::invalid_document(format!(
                        "{label} slot number {number} outside 1..={capacity}"
                    ))
                })?;
            if placed[index].is_some() {
                return Err(ConfigError::invalid_document(format!(
                    "{label} slot number {number} used twice"
                )));
            }
            placed[index] = Some(Entry { slot, residue });
        }
        // Unique numbers in range over `capacity` records fill every position.
        let entries = placed.into_iter().flatten().collect();
        Ok(Self { label, entries })
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.slot.is_free())
            .count()
    }

    #[must_use]
    pub fn slot(&self, number: u16) -> Option<&Slot<T>> {
        self.index(number).map(|index| &self.entries[index].slot)
    }

    /// Payload of an occupied slot.
    #[must_use]
    pub fn get(&self, number: u16) -> Option<&T> {
        self.slot(number).and_then(Slot::occupied)
    }

    pub fn get_mut(&mut self, number: u16) -> Option<&mut T> {
        let index = self.index(number)?;
        match &mut self.entries[index].slot {
            Slot::Occupied(payload) => Some(payload),
            Slot::Free => None,
        }
    }

    #[must_use]
    pub fn is_active(&self, number: u16) -> bool {
        self.get(number).is_some()
    }

    /// Lowest-numbered free slot.
    #[must_use]
    pub fn first_free(&self) -> Option<u16> {
        self.entries
            .iter()
            .position(|entry| entry.slot.is_free())
            .map(number_of)
    }

    /// Occupy the lowest-numbered free slot with `payload`.
    pub fn allocate(&mut self, payload: T) -> Result<u16, ConfigError> {
        let number = self.first_free().ok_or(ConfigError::CapacityExceeded {
            table: self.label,
            capacity: self.capacity(),
        })?;
        self.activate(number, payload)?;
        Ok(number)
    }

    /// Write `payload` into slot `number` and mark it occupied.
    pub fn activate(&mut self, number: u16, payload: T) -> Result<(), ConfigError> {
        let index = self.require(number)?;
        let entry = &mut self.entries[index];
        entry.slot = Slot::Occupied(payload);
        entry.residue = None;
        Ok(())
    }

    /// Free slot `number`, returning its previous payload.
    pub fn release(&mut self, number: u16) -> Result<Option<T>, ConfigError> {
        let index = self.require(number)?;
        let entry = &mut self.entries[index];
        entry.residue = None;
        Ok(match std::mem::replace(&mut entry.slot, Slot::Free) {
            Slot::Occupied(payload) => Some(payload),
            Slot::Free => None,
        })
    }

    /// All slots in number order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Slot<T>)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (number_of(index), &entry.slot))
    }

    /// Occupied slots in number order.
    pub fn occupied(&self) -> impl Iterator<Item = (u16, &T)> {
        self.iter()
            .filter_map(|(number, slot)| slot.occupied().map(|payload| (number, payload)))
    }

    pub(crate) fn occupied_mut(&mut self) -> impl Iterator<Item = (u16, &mut T)> {
        self.entries
            .iter_mut()
            .enumerate()
            .filter_map(|(index, entry)| match &mut entry.slot {
                Slot::Occupied(payload) => Some((number_of(index), payload)),
                Slot::Free => None,
            })
    }

    pub(crate) fn records(&self) -> impl Iterator<Item = (u16, &Slot<T>, Option<&T>)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (number_of(index), &entry.slot, entry.residue.as_ref()))
    }

    fn index(&self, number: u16) -> Option<usize> {
        usize::from(number)
            .checked_sub(1)
            .filter(|index| *index < self.entries.len())
    }

    fn require(&self, number: u16) -> Result<usize, ConfigError> {
        self.index(number)
            .ok_or_else(|| ConfigError::not_found(format!("{} slot {number}", self.label)))
    }
}

fn number_of(index: usize) -> u16 {
    u16::try_from(index + 1).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(capacity: usize) -> SlotTable<&'static str> {
        SlotTable::new("condition", capacity)
    }

    #[test]
    fn allocate_takes_lowest_free_slot() {
        let mut slots = table(4);
        assert_eq!(slots.allocate("a").unwrap(), 1);
        assert_eq!(slots.allocate("b").unwrap(), 2);
        assert_eq!(slots.allocate("c").unwrap(), 3);
        slots.release(2).unwrap();
        assert_eq!(slots.first_free(), Some(2));
        assert_eq!(slots.allocate("d").unwrap(), 2);
        assert_eq!(slots.allocate("e").unwrap(), 4);
    }

    #[test]
    fn reoccupied_slot_keeps_its_number() {
        let mut slots = table(3);
        slots.allocate("old").unwrap();
        let number = slots.allocate("victim").unwrap();
        assert_eq!(slots.release(number).unwrap(), Some("victim"));
        assert!(!slots.is_active(number));
        slots.activate(number, "new").unwrap();
        assert_eq!(slots.get(number), Some(&"new"));
        assert_eq!(
            slots.occupied().collect::<Vec<_>>(),
            vec![(1, &"old"), (2, &"new")]
        );
    }

    #[test]
    fn full_table_rejects_allocation_unchanged() {
        let mut slots = table(2);
        slots.allocate("a").unwrap();
        slots.allocate("b").unwrap();
        let err = slots.allocate("c").unwrap_err();
        assert_eq!(
            err,
            ConfigError::CapacityExceeded {
                table: "condition",
                capacity: 2
            }
        );
        assert_eq!(slots.capacity(), 2);
        assert_eq!(
            slots.occupied().map(|(_, v)| *v).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn out_of_range_numbers_are_not_found() {
        let mut slots = table(2);
        assert!(matches!(slots.release(0), Err(ConfigError::NotFound(_))));
        assert!(matches!(
            slots.activate(3, "x"),
            Err(ConfigError::NotFound(_))
        ));
        assert!(slots.slot(3).is_none());
    }

    #[test]
    fn records_must_cover_unique_numbers() {
        let ok = SlotTable::from_records(
            "action",
            vec![(2, Slot::Occupied("b"), None), (1, Slot::Free, Some("stale"))],
        )
        .unwrap();
        assert_eq!(ok.get(2), Some(&"b"));
        assert!(ok.get(1).is_none());

        let duplicate = SlotTable::from_records(
            "action",
            vec![(1, Slot::Occupied("a"), None), (1, Slot::Free, None)],
        );
        assert!(matches!(duplicate, Err(ConfigError::InvalidDocument(_))));

        let gap = SlotTable::<&str>::from_records("action", vec![(3, Slot::Free, None)]);
        assert!(matches!(gap, Err(ConfigError::InvalidDocument(_))));
    }

    #[test]
    fn release_drops_residue() {
        let mut slots =
            SlotTable::from_records("group", vec![(1, Slot::Free, Some("stale"))]).unwrap();
        assert_eq!(slots.records().next().unwrap().2, Some(&"stale"));
        slots.release(1).unwrap();
        assert_eq!(slots.records().next().unwrap().2, None);
    }
}
