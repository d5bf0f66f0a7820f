//! A tarot reading on top of the animation core
//!
//! [`TarotSession`] owns the table: which targets are cards, which card shows
//! which image, and the sequencer that keeps one choreography in flight at a
//! time. Every operation is rejected with [`Error::Busy`] while a phase runs.

pub mod layout;

use crate::animation::easing::EasingFunction;
use crate::animation::scheduler::AnimationScheduler;
use crate::animation::selection::select_without_replacement;
use crate::animation::sequencer::{CompletionSignal, PhaseKind, PhaseSpec, Sequence, Sequencer};
use crate::animation::tween::Tween;
use crate::content::ImageEntry;
use crate::core::config::{PhaseTimingConfig, SessionOptions, ShuffleConfig};
use crate::core::vector::Vec3;
use crate::scene::{AnimatableTarget, PropertyBinder, SceneAdapter, TargetId, TargetKind, TargetProperty};
use crate::traits::Animation;
use crate::{Error, Result};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

/// Kept cards shrink to this while travelling and pop back on settle
const IN_TRANSIT_SCALE: f64 = 0.6;

/// One card of the spread
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: TargetId,
    /// Caption under the card
    pub label: TargetId,
    pub slot: usize,
    /// Face image, shown once the card is turned over
    pub image: Option<ImageEntry>,
    pub face_up: bool,
}

#[derive(Debug, Default)]
struct Table {
    cards: Vec<Card>,
    /// Shuffle cards with their sphere points, until the cull
    placeholders: Vec<(TargetId, Vec3)>,
    links: Vec<TargetId>,
}

impl Table {
    fn target_ids(&self) -> Vec<TargetId> {
        self.cards
            .iter()
            .flat_map(|card| [card.id, card.label])
            .chain(self.placeholders.iter().map(|(id, _)| *id))
            .chain(self.links.iter().copied())
            .collect()
    }
}

fn together(animations: Vec<Box<dyn Animation>>) -> Box<dyn Animation> {
    Box::new(AnimationScheduler::from(animations))
}

pub struct TarotSession<S: SceneAdapter + 'static> {
    binder: PropertyBinder<S>,
    sequencer: Sequencer,
    options: SessionOptions,
    table: Rc<RefCell<Table>>,
    rng: Rc<RefCell<Xoshiro256StarStar>>,
}

impl<S: SceneAdapter + 'static> TarotSession<S> {
    /// Create a session drawing on `scene`. The same seed replays the same
    /// shuffle.
    pub fn new(scene: Rc<RefCell<S>>, options: SessionOptions, seed: u64) -> Result<Self> {
        options.validate()?;
        log::info!(
            "new tarot session: {} cards, shuffle {} -> {}, seed {}",
            options.shuffle.card_count,
            options.shuffle.placeholder_count,
            options.shuffle.kept_cards,
            seed
        );
        Ok(Self {
            binder: PropertyBinder::new(scene),
            sequencer: Sequencer::new(),
            options,
            table: Rc::new(RefCell::new(Table::default())),
            rng: Rc::new(RefCell::new(Xoshiro256StarStar::seed_from_u64(seed))),
        })
    }

    pub fn scene(&self) -> &Rc<RefCell<S>> {
        self.binder.scene()
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn is_busy(&self) -> bool {
        self.sequencer.is_busy()
    }

    pub fn current_phase(&self) -> Option<&PhaseKind> {
        self.sequencer.current_phase()
    }

    pub fn clock_ms(&self) -> f64 {
        self.sequencer.clock_ms()
    }

    /// Cards on the table, by slot
    pub fn cards(&self) -> Vec<Card> {
        self.table.borrow().cards.clone()
    }

    /// Image shown in each slot; `None` while a card is face down
    pub fn reading(&self) -> Vec<Option<ImageEntry>> {
        self.table
            .borrow()
            .cards
            .iter()
            .map(|card| card.image.clone().filter(|_| card.face_up))
            .collect()
    }

    fn ensure_idle(&self, action: &str) -> Result<()> {
        if !self.sequencer.is_busy() {
            return Ok(());
        }
        match self.sequencer.current_phase() {
            Some(phase) => log::warn!("{action} rejected: {phase} phase in flight"),
            None => log::warn!("{action} rejected while busy"),
        }
        Err(Error::Busy)
    }

    fn clear_table(&self) {
        let ids = self.table.borrow().target_ids();
        for id in ids {
            self.binder.despawn(id);
        }
        *self.table.borrow_mut() = Table::default();
    }

    /// Deal a fresh row of face-down cards: they rise into their slots one
    /// after another, then their captions appear.
    pub fn deal(&mut self, images: &[ImageEntry]) -> Result<CompletionSignal> {
        self.ensure_idle("deal")?;
        if images.is_empty() {
            return Err(Error::Phase("no images to deal".into()));
        }
        self.clear_table();

        let count = self.options.shuffle.card_count;
        let spacing = self.options.shuffle.slot_spacing;
        let cards: Vec<Card> = layout::spread_slots(count, spacing)
            .into_iter()
            .enumerate()
            .map(|(slot, home)| {
                let id = self.binder.spawn(
                    AnimatableTarget::new(TargetKind::Card)
                        .at(layout::deal_start(home))
                        .with_opacity(0.0),
                );
                let label = self
                    .binder
                    .spawn(AnimatableTarget::new(TargetKind::Label).at(layout::label_position(home)));
                Card {
                    id,
                    label,
                    slot,
                    image: Some(images[slot % images.len()].clone()),
                    face_up: false,
                }
            })
            .collect();
        self.table.borrow_mut().cards = cards.clone();

        let timing = &self.options.timing;
        let sequence = Sequence::new()
            .then(self.entry_phase(cards.clone(), count, spacing, timing))
            .then(self.caption_phase(cards, timing));
        let signal = self.sequencer.run_sequence(sequence)?;
        log::info!("dealing {count} cards");
        Ok(signal)
    }

    /// Turn card `index` face up: a half turn, the image swap, then the
    /// caption fades back in. Flipping a face-up card does nothing.
    pub fn flip(&mut self, index: usize) -> Result<CompletionSignal> {
        self.ensure_idle("flip")?;
        let card = {
            let table = self.table.borrow();
            table.cards.get(index).cloned().ok_or(Error::InvalidCardIndex {
                index,
                count: table.cards.len(),
            })?
        };
        if card.face_up {
            log::debug!("card {index} is already face up");
            return Ok(CompletionSignal::resolved(
                PhaseKind::Flip.to_string(),
                self.sequencer.clock_ms(),
            ));
        }

        let binder = self.binder.clone();
        let table = self.table.clone();
        let timing = self.options.timing.clone();
        let flip = PhaseSpec::new(PhaseKind::Flip, vec![card.clone()], 0.0, move |_, card: Card| {
            let (id, label) = (card.id, card.label);
            let swap = binder.clone();
            let table = table.clone();
            let turn = binder
                .tween_vec3(
                    id,
                    TargetProperty::Rotation,
                    Vec3::ZERO,
                    layout::FACE_UP,
                    timing.flip_duration_ms,
                    timing.flip_easing,
                )?
                .on_complete(move || {
                    if let Some(image) = &card.image {
                        swap.set_image(card.id, image);
                        swap.set_image(card.label, image);
                    }
                    if let Some(entry) = table.borrow_mut().cards.get_mut(card.slot) {
                        entry.face_up = true;
                    }
                });
            let hide_caption = binder.tween_opacity(
                label,
                1.0,
                0.0,
                timing.flip_duration_ms / 2.0,
                EasingFunction::EaseOutQuad,
            )?;
            Ok(together(vec![turn.boxed(), hide_caption.boxed()]))
        });

        let sequence = Sequence::new()
            .then(flip)
            .then(self.caption_phase(vec![card], &self.options.timing));
        let signal = self.sequencer.run_sequence(sequence)?;
        log::info!("flipping card {index}");
        Ok(signal)
    }

    /// The cosmic shuffle.
    ///
    /// A cloud of placeholder cards grows onto a sphere, orbits, and is culled
    /// down to the kept cards: those travel to slots `0..K` in draw order while
    /// the rest fly off below the table and are removed. The kept cards then
    /// settle with their images, captions and link indicators.
    pub fn cosmic_shuffle(&mut self, images: &[ImageEntry]) -> Result<CompletionSignal> {
        self.ensure_idle("cosmic shuffle")?;
        if images.is_empty() {
            return Err(Error::Phase("no images to shuffle".into()));
        }
        self.clear_table();

        let shuffle = &self.options.shuffle;
        let timing = &self.options.timing;
        let placeholders: Vec<(TargetId, Vec3)> =
            layout::fibonacci_sphere(shuffle.placeholder_count, shuffle.sphere_radius)
                .into_iter()
                .map(|point| {
                    let id = self
                        .binder
                        .spawn(AnimatableTarget::new(TargetKind::Card).with_scale(Vec3::ZERO));
                    (id, point)
                })
                .collect();
        self.table.borrow_mut().placeholders = placeholders.clone();

        let sweep = shuffle.orbit_turns * TAU;
        let sequence = Sequence::new()
            .then(self.appear_phase(placeholders.clone(), timing))
            .then(self.orbit_phase(placeholders, sweep, timing))
            .then(self.cull_phase(images.to_vec(), sweep, shuffle, timing))
            .then(self.settle_phase(shuffle, timing));
        let signal = self.sequencer.run_sequence(sequence)?;
        log::info!(
            "cosmic shuffle: {} placeholders, keeping {}",
            shuffle.placeholder_count,
            shuffle.kept_cards
        );
        Ok(signal)
    }

    fn entry_phase(
        &self,
        cards: Vec<Card>,
        count: usize,
        spacing: f64,
        timing: &PhaseTimingConfig,
    ) -> PhaseSpec {
        let binder = self.binder.clone();
        let (duration, easing) = (timing.entry_duration_ms, timing.entry_easing);
        PhaseSpec::new(
            PhaseKind::Entry,
            cards,
            timing.card_stagger_ms,
            move |_, card: Card| {
                let home = layout::slot_position(card.slot, count, spacing);
                let rise = binder.tween_vec3(
                    card.id,
                    TargetProperty::Position,
                    layout::deal_start(home),
                    home,
                    duration,
                    easing,
                )?;
                let fade = binder.tween_opacity(card.id, 0.0, 1.0, duration, easing)?;
                Ok(together(vec![rise.boxed(), fade.boxed()]))
            },
        )
    }

    fn caption_phase(&self, cards: Vec<Card>, timing: &PhaseTimingConfig) -> PhaseSpec {
        let binder = self.binder.clone();
        let (duration, easing) = (timing.label_fade_ms, timing.label_easing);
        PhaseSpec::new(
            PhaseKind::Reveal,
            cards,
            timing.card_stagger_ms,
            move |_, card: Card| Ok(binder.tween_opacity(card.label, 0.0, 1.0, duration, easing)?.boxed()),
        )
    }

    fn appear_phase(&self, placeholders: Vec<(TargetId, Vec3)>, timing: &PhaseTimingConfig) -> PhaseSpec {
        let binder = self.binder.clone();
        let (duration, easing) = (timing.appear_duration_ms, timing.appear_easing);
        PhaseSpec::new(
            PhaseKind::ShuffleAppear,
            placeholders,
            timing.appear_stagger_ms,
            move |_, (id, point): (TargetId, Vec3)| {
                let grow = binder.tween_vec3(id, TargetProperty::Scale, Vec3::ZERO, Vec3::ONE, duration, easing)?;
                let spread = binder.tween_vec3(id, TargetProperty::Position, Vec3::ZERO, point, duration, easing)?;
                Ok(together(vec![grow.boxed(), spread.boxed()]))
            },
        )
    }

    fn orbit_phase(
        &self,
        placeholders: Vec<(TargetId, Vec3)>,
        sweep: f64,
        timing: &PhaseTimingConfig,
    ) -> PhaseSpec {
        let binder = self.binder.clone();
        let (duration, easing) = (timing.orbit_duration_ms, timing.orbit_easing);
        PhaseSpec::new(
            PhaseKind::Orbit,
            placeholders,
            0.0,
            move |_, (id, point): (TargetId, Vec3)| {
                // Tween the angle, not the position, so cards stay on the sphere
                let ticket = binder.claim(id, TargetProperty::Position);
                let writer = binder.clone();
                let orbit = Tween::new(0.0, sweep, duration, easing, move |angle: f64| {
                    writer.write_vec3(&ticket, point.rotate_y(angle));
                })?;
                Ok(orbit.boxed())
            },
        )
    }

    fn cull_phase(
        &self,
        images: Vec<ImageEntry>,
        sweep: f64,
        shuffle: &ShuffleConfig,
        timing: &PhaseTimingConfig,
    ) -> PhaseSpec {
        let binder = self.binder.clone();
        let table = self.table.clone();
        let rng = self.rng.clone();
        let shuffle = shuffle.clone();
        let timing = timing.clone();

        PhaseSpec::deferred(PhaseKind::CullAndFly, timing.cull_stagger_ms, move || {
            let pool: Vec<(TargetId, Vec3)> = std::mem::take(&mut table.borrow_mut().placeholders)
                .into_iter()
                .map(|(id, point)| (id, point.rotate_y(sweep)))
                .collect();
            let mut rng = rng.borrow_mut();
            let selection = select_without_replacement(pool, shuffle.kept_cards, &mut *rng)?;
            log::debug!("kept placeholders {:?}", selection.kept_indices());

            let slots = layout::spread_slots(shuffle.kept_cards, shuffle.slot_spacing);
            let mut items = Vec::with_capacity(selection.kept.len() + selection.discarded.len());
            let mut cards = Vec::with_capacity(selection.kept.len());

            for (slot, picked) in selection.kept.into_iter().enumerate() {
                let (id, from) = picked.item;
                let home = slots[slot];
                let label = binder.spawn(AnimatableTarget::new(TargetKind::Label).at(layout::label_position(home)));
                cards.push(Card {
                    id,
                    label,
                    slot,
                    image: Some(images[picked.pool_index % images.len()].clone()),
                    face_up: false,
                });

                let (duration, easing) = (timing.move_to_slot_duration_ms, timing.move_easing);
                let travel = binder.tween_vec3(id, TargetProperty::Position, from, home, duration, easing)?;
                let turn = binder.tween_vec3(id, TargetProperty::Rotation, Vec3::ZERO, layout::FACE_UP, duration, easing)?;
                let shrink = binder.tween_vec3(
                    id,
                    TargetProperty::Scale,
                    Vec3::ONE,
                    Vec3::splat(IN_TRANSIT_SCALE),
                    duration,
                    easing,
                )?;
                items.push(together(vec![travel.boxed(), turn.boxed(), shrink.boxed()]));
            }

            for picked in selection.discarded {
                let (id, from) = picked.item;
                let target = shuffle.fly_away.target(&mut *rng);
                let (duration, easing) = (timing.fly_away_duration_ms, timing.fly_away_easing);
                let remover = binder.clone();
                let fly = binder.tween_vec3(id, TargetProperty::Position, from, target, duration, easing)?;
                let fade = binder
                    .tween_opacity(id, 1.0, 0.0, duration, easing)?
                    .on_complete(move || {
                        remover.despawn(id);
                    });
                items.push(together(vec![fly.boxed(), fade.boxed()]));
            }

            table.borrow_mut().cards = cards;
            Ok(items)
        })
    }

    fn settle_phase(&self, shuffle: &ShuffleConfig, timing: &PhaseTimingConfig) -> PhaseSpec {
        let binder = self.binder.clone();
        let table = self.table.clone();
        let spacing = shuffle.slot_spacing;
        let timing = timing.clone();

        PhaseSpec::deferred(PhaseKind::Settle, timing.card_stagger_ms, move || {
            let mut table = table.borrow_mut();
            let mut items = Vec::new();

            for card in table.cards.iter_mut() {
                if let Some(image) = &card.image {
                    binder.set_image(card.id, image);
                    binder.set_image(card.label, image);
                }
                card.face_up = true;

                let pop = binder.tween_vec3(
                    card.id,
                    TargetProperty::Scale,
                    Vec3::splat(IN_TRANSIT_SCALE),
                    Vec3::ONE,
                    timing.settle_duration_ms,
                    timing.settle_easing,
                )?;
                let caption = binder.tween_opacity(card.label, 0.0, 1.0, timing.label_fade_ms, timing.label_easing)?;
                items.push(together(vec![pop.boxed(), caption.boxed()]));
            }

            let homes = layout::spread_slots(table.cards.len(), spacing);
            for pair in homes.windows(2) {
                let id = binder.spawn(
                    AnimatableTarget::new(TargetKind::LinkIndicator).at(layout::link_position(pair[0], pair[1])),
                );
                table.links.push(id);
                items.push(
                    binder
                        .tween_opacity(id, 0.0, 1.0, timing.label_fade_ms, EasingFunction::EaseOutSine)?
                        .boxed(),
                );
            }
            Ok(items)
        })
    }
}

impl<S: SceneAdapter + 'static> Animation for TarotSession<S> {
    fn advance(&mut self, delta_ms: f64) -> bool {
        self.sequencer.advance(delta_ms)
    }

    fn is_finished(&self) -> bool {
        !self.is_busy()
    }
}
