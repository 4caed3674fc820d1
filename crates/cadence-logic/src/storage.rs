// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Block-chained slot storage with an intrusive free list.

/// The state of a single slot.
///
/// A vacant slot stores the link to the next vacant slot, so the free list is
/// threaded through the storage itself and needs no side allocation.
#[derive(Debug)]
enum SlotState<T> {
    Occupied(T),
    Vacant { next_free: Option<u32> },
}

#[derive(Debug)]
struct Slot<T> {
    /// Bumped every time the slot is released.
    generation: u32,
    state: SlotState<T>,
}

/// A growable pool of slots whose entries never move.
///
/// Slots are allocated in fixed-size blocks. Each block is boxed separately and
/// blocks are never freed, so the address of a live entry is stable for the whole
/// lifetime of the storage, even while new blocks are being appended. Released
/// slots are pushed on the free list and recycled first-in, last-out.
#[derive(Debug)]
pub(crate) struct SlotStorage<T> {
    blocks: Vec<Box<[Slot<T>]>>,
    slots_per_block: usize,
    /// Head of the intrusive free list.
    free_head: Option<u32>,
    /// One past the highest slot index ever handed out.
    high_water: u32,
    live: usize,
}

impl<T> SlotStorage<T> {
    /// Creates an empty storage. No block is allocated until the first insert.
    pub fn new(slots_per_block: usize) -> Self {
        debug_assert!(slots_per_block > 0, "a block must hold at least one slot");
        Self {
            blocks: Vec::new(),
            slots_per_block: slots_per_block.max(1),
            free_head: None,
            high_water: 0,
            live: 0,
        }
    }

    /// Stores `value` in a free slot, growing the storage by one block if needed.
    ///
    /// Returns the slot index and its current generation.
    pub fn insert(&mut self, value: T) -> (u32, u32) {
        if self.free_head.is_none() {
            self.grow();
        }
        let index = match self.free_head {
            Some(index) => index,
            None => unreachable!("growing the storage always refills the free list"),
        };

        let slot = self.slot_mut(index);
        let next_free = match slot.state {
            SlotState::Vacant { next_free } => next_free,
            SlotState::Occupied(_) => unreachable!("free list points at an occupied slot"),
        };
        slot.state = SlotState::Occupied(value);
        let generation = slot.generation;

        self.free_head = next_free;
        self.high_water = self.high_water.max(index + 1);
        self.live += 1;
        (index, generation)
    }

    /// Releases the slot if `generation` still matches, returning its value.
    ///
    /// The slot's generation is incremented (wrapping) and the slot becomes the
    /// new head of the free list.
    pub fn remove(&mut self, index: u32, generation: u32) -> Option<T> {
        let next_free = self.free_head;
        let slot = self.slot_at_mut(index)?;
        if slot.generation != generation || !matches!(slot.state, SlotState::Occupied(_)) {
            return None;
        }

        let value = match std::mem::replace(&mut slot.state, SlotState::Vacant { next_free }) {
            SlotState::Occupied(value) => value,
            SlotState::Vacant { .. } => unreachable!(),
        };
        slot.generation = slot.generation.wrapping_add(1);

        self.free_head = Some(index);
        self.live -= 1;
        Some(value)
    }

    /// Returns the entry in `index` if it is live and of the given generation.
    pub fn get(&self, index: u32, generation: u32) -> Option<&T> {
        let (block, offset) = self.locate(index)?;
        let slot = &self.blocks.get(block)?[offset];
        match &slot.state {
            SlotState::Occupied(value) if slot.generation == generation => Some(value),
            _ => None,
        }
    }

    /// Mutable variant of [`SlotStorage::get`].
    pub fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        let slot = self.slot_at_mut(index)?;
        match &mut slot.state {
            SlotState::Occupied(value) if slot.generation == generation => Some(value),
            _ => None,
        }
    }

    /// Returns the live entry in `index` together with its generation, whatever it is.
    pub fn occupant_mut(&mut self, index: u32) -> Option<(u32, &mut T)> {
        let slot = self.slot_at_mut(index)?;
        match &mut slot.state {
            SlotState::Occupied(value) => Some((slot.generation, value)),
            SlotState::Vacant { .. } => None,
        }
    }

    /// One past the highest slot index ever allocated.
    pub fn high_water(&self) -> u32 {
        self.high_water
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Total number of slots, live or vacant.
    pub fn capacity(&self) -> usize {
        self.blocks.len() * self.slots_per_block
    }

    /// Number of blocks allocated so far.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Appends a block and chains its slots on the free list, lowest index on top.
    fn grow(&mut self) {
        let first = self.capacity() as u32;
        let count = self.slots_per_block as u32;
        let tail = self.free_head;
        let block: Vec<Slot<T>> = (first..first + count)
            .map(|index| Slot {
                generation: 0,
                state: SlotState::Vacant {
                    next_free: if index + 1 < first + count {
                        Some(index + 1)
                    } else {
                        tail
                    },
                },
            })
            .collect();
        self.blocks.push(block.into_boxed_slice());
        self.free_head = Some(first);

        log::debug!(
            "Timer storage grew to {} block(s), {} slots",
            self.blocks.len(),
            self.capacity()
        );
    }

    fn locate(&self, index: u32) -> Option<(usize, usize)> {
        let index = index as usize;
        let block = index / self.slots_per_block;
        (block < self.blocks.len()).then_some((block, index % self.slots_per_block))
    }

    fn slot_at_mut(&mut self, index: u32) -> Option<&mut Slot<T>> {
        let (block, offset) = self.locate(index)?;
        Some(&mut self.blocks[block][offset])
    }

    fn slot_mut(&mut self, index: u32) -> &mut Slot<T> {
        let block = index as usize / self.slots_per_block;
        let offset = index as usize % self.slots_per_block;
        &mut self.blocks[block][offset]
    }
}
