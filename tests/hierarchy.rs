//! Whole-tree behavior exercised through the public API

use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::rc::Rc;
use vfx_groups::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn spark(life: f32) -> BasicParticle {
    BasicParticle::new(Vector3::new(0.0, 0.0, 0.0), life)
}

fn group<'a>(
    tree: &'a GroupTree<BasicParticle>,
    id: GroupId,
) -> Result<&'a ParticleGroup<BasicParticle>> {
    tree.get(id).ok_or_else(|| anyhow!("missing {id}"))
}

fn group_mut<'a>(
    tree: &'a mut GroupTree<BasicParticle>,
    id: GroupId,
) -> Result<&'a mut ParticleGroup<BasicParticle>> {
    tree.get_mut(id).ok_or_else(|| anyhow!("missing {id}"))
}

fn two_level(parent_name: &str, child_name: &str) -> Result<(GroupTree<BasicParticle>, GroupId, GroupId)> {
    let mut tree = GroupTree::new();
    let parent = tree.insert(ParticleGroup::new(parent_name, 8));
    let child = tree.insert(ParticleGroup::new(child_name, 8));
    tree.attach(parent, child)?;
    Ok((tree, parent, child))
}

#[test]
fn capacity_holds_across_mixed_operations() -> Result<()> {
    init_logging();
    let mut g = ParticleGroup::new("mixed", 5).with_overflow_strategy(CullOldest);
    for round in 0..6 {
        g.add_all((0..4).map(|i| spark(1.0 + (round * 4 + i) as f32)));
        assert!(g.size() <= g.capacity());
        g.add(spark(0.5));
        assert!(g.size() <= g.capacity());
        g.remove(0);
        g.set_capacity(5 - round % 3);
        assert!(g.size() <= g.capacity());
        g.step(true, 0.25, 1.0);
        assert!(g.size() <= g.capacity());
    }
    assert!(g.reset());
    assert_eq!(g.size(), 0);
    Ok(())
}

#[test]
fn world_paused_group_ignores_mutation() -> Result<()> {
    init_logging();
    let (mut tree, parent, child) = two_level("parent", "child")?;
    group_mut(&mut tree, child)?.add(spark(3.0));
    group_mut(&mut tree, parent)?.pause();
    tree.update(0.1);

    let c = group_mut(&mut tree, child)?;
    assert!(c.is_playing());
    assert!(!c.world_play_state());
    assert!(!c.add(spark(1.0)));
    assert_eq!(c.add_all(vec![spark(1.0), spark(2.0)]), 0);
    assert!(c.remove(0).is_none());
    assert_eq!(c.clear_all_particles(), 0);
    assert!(!c.reset());
    assert_eq!(c.size(), 1);
    assert!(!tree.reset(child)?);
    Ok(())
}

#[test]
fn delay_is_local_to_the_group() -> Result<()> {
    init_logging();
    let (mut tree, parent, child) = two_level("late", "eager")?;
    group_mut(&mut tree, parent)?.set_initial_delay(2.0)?;
    group_mut(&mut tree, parent)?.add(spark(5.0));
    group_mut(&mut tree, child)?.add(spark(5.0));

    tree.update(1.0);
    let p = group(&tree, parent)?;
    assert!(p.in_delay_zone());
    assert_eq!(p.raw_time(), 1.0);
    assert_eq!(p.time(), 0.0);
    assert_eq!(p.particles()[0].life, 5.0);
    let c = group(&tree, child)?;
    assert_eq!(c.raw_time(), 1.0);
    assert_eq!(c.particles()[0].life, 4.0);

    tree.update(1.5);
    let p = group(&tree, parent)?;
    assert!(!p.in_delay_zone());
    assert_eq!(p.time(), 0.5);
    assert_eq!(p.particles()[0].life, 3.5);
    assert_eq!(tree.world_initial_delay(child)?, 2.0);
    Ok(())
}

#[test]
fn decay_compounds_only_when_inherited() -> Result<()> {
    init_logging();
    let mut tree = GroupTree::new();
    let parent = tree.insert(ParticleGroup::new("parent", 1));
    let inheriting = tree.insert(ParticleGroup::new("inheriting", 1));
    let local = tree.insert(ParticleGroup::new("local", 1));
    tree.attach(parent, inheriting)?;
    tree.attach(parent, local)?;

    group_mut(&mut tree, parent)?.set_decay_rate(2.0)?;
    for id in [inheriting, local] {
        let g = group_mut(&mut tree, id)?;
        g.set_decay_rate(3.0)?;
        g.add(spark(10.0));
    }
    group_mut(&mut tree, inheriting)?.set_inherit_decay_rate(true);

    tree.update(1.0);
    assert_eq!(group(&tree, inheriting)?.particles()[0].life, 4.0);
    assert_eq!(group(&tree, local)?.particles()[0].life, 7.0);
    assert_eq!(tree.world_decay_rate(local)?, 6.0);
    Ok(())
}

#[test]
fn full_group_rejects_by_default() -> Result<()> {
    init_logging();
    let mut g: ParticleGroup<BasicParticle> = ParticleGroup::new("full", 3);
    assert_eq!(g.add_all((1..=3).map(|i| spark(i as f32))), 3);
    assert!(g.is_full());
    assert!(!g.add(spark(9.0)));
    assert_eq!(g.size(), 3);
    assert!(g.iter().all(|p| p.life < 9.0));
    Ok(())
}

#[test]
fn dynamic_sizing_grows_instead_of_evicting() -> Result<()> {
    init_logging();
    let mut g = ParticleGroup::with_settings(
        "growing",
        GroupSettings {
            capacity: 3,
            dynamic_sizing_step: Some(2),
            ..Default::default()
        },
    )?;
    for i in 0..3 {
        assert!(g.add(spark(i as f32 + 1.0)));
    }
    assert!(g.add(spark(4.0)));
    assert_eq!(g.size(), 4);
    assert_eq!(g.capacity(), 6);
    Ok(())
}

#[test]
fn reset_cascades_while_playing_only() -> Result<()> {
    init_logging();
    let (mut tree, parent, child) = two_level("parent", "child")?;
    group_mut(&mut tree, parent)?.add(spark(5.0));
    group_mut(&mut tree, child)?.add(spark(5.0));
    tree.update(0.5);

    group_mut(&mut tree, parent)?.pause();
    tree.update(0.5);
    assert!(!tree.reset(parent)?);
    assert_eq!(group(&tree, parent)?.size(), 1);
    assert_eq!(group(&tree, child)?.size(), 1);
    assert_eq!(group(&tree, child)?.raw_time(), 0.5);

    group_mut(&mut tree, parent)?.play();
    tree.update(0.5);
    assert!(tree.reset(parent)?);
    for id in [parent, child] {
        let g = group(&tree, id)?;
        assert!(g.is_empty());
        assert_eq!(g.raw_time(), 0.0);
    }
    Ok(())
}

/// Appends `label:hook` to a shared log
struct Tracer {
    label: &'static str,
    log: Rc<RefCell<Vec<String>>>,
}

impl ParticleDriver<BasicParticle> for Tracer {
    fn update_group(&mut self, _group: &mut GroupContext<'_, BasicParticle>, _tpf: f32) {
        self.log.borrow_mut().push(format!("{}:group", self.label));
    }

    fn update_particle(&mut self, _particle: &mut BasicParticle, _tpf: f32) {
        self.log.borrow_mut().push(format!("{}:particle", self.label));
    }

    fn name(&self) -> &str {
        self.label
    }
}

#[test]
fn front_drivers_run_first() -> Result<()> {
    init_logging();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut g = ParticleGroup::new("ordered", 4);
    g.add_driver(Tracer {
        label: "a",
        log: Rc::clone(&log),
    });
    g.add_driver_front(Tracer {
        label: "b",
        log: Rc::clone(&log),
    });
    g.add(spark(10.0));

    for _ in 0..2 {
        log.borrow_mut().clear();
        g.step(true, 0.1, 1.0);
        assert_eq!(
            *log.borrow(),
            ["b:group", "a:group", "b:particle", "a:particle"]
        );
    }

    assert!(g.remove_driver_named("b").is_some());
    let names: Vec<&str> = g.drivers().iter().map(|d| d.name()).collect();
    assert_eq!(names, ["a"]);
    Ok(())
}

#[test]
fn seeded_trees_replay_identically() -> Result<()> {
    init_logging();
    let build = || -> Result<GroupTree<BasicParticle>> {
        let mut tree = GroupTree::new();
        let fountain = tree.insert(
            ParticleGroup::new("fountain", 64)
                .with_volume(EmissionSphere::new(1.5)?)
                .with_driver(Emitter::new(30.0, 17, |position, _rng| {
                    BasicParticle::new(position, 1.0).with_velocity(Vector3::new(0.0, 0.0, 4.0))
                })?)
                .with_driver(ForceField::gravity(Vector3::new(0.0, 0.0, -9.8)))
                .with_driver(Motion::default()),
        );
        let embers = tree.insert(
            ParticleGroup::new("embers", 16)
                .with_volume(EmissionBox::new(Vector3::new(1.0, 1.0, 0.0))?)
                .with_driver(Emitter::new(12.0, 18, |position, _rng| BasicParticle::new(position, 0.5))?),
        );
        tree.attach(fountain, embers)?;
        tree.set_fixed_timestep(Some(1.0 / 60.0))?;
        Ok(tree)
    };

    let mut a = build()?;
    let mut b = build()?;
    for _ in 0..30 {
        a.update(1.0 / 30.0);
        b.update(1.0 / 30.0);
    }
    assert_eq!(a.stats().step_count, b.stats().step_count);
    for (&ra, &rb) in a.roots().iter().zip(b.roots()) {
        let (ga, gb) = (group(&a, ra)?, group(&b, rb)?);
        assert!(ga.size() > 0);
        assert_eq!(ga.particles(), gb.particles());
        for (&ca, &cb) in ga.children().iter().zip(gb.children()) {
            let (ca, cb) = (group(&a, ca)?, group(&b, cb)?);
            assert!(ca.size() <= ca.capacity());
            assert_eq!(ca.particles(), cb.particles());
        }
    }
    Ok(())
}
