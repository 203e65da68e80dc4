use glam::Mat4;

use super::input::{ActionStates, InputAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
    GameOver,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(quit_requested: bool, actions: ActionStates) -> Self {
        Self {
            quit_requested,
            actions,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_quit_requested(mut self, quit_requested: bool) -> Self {
        self.quit_requested = quit_requested;
        self
    }
}

/// Asset key of a texture, resolved by the renderer to
/// `<assets>/textures/<key>.png`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureKey(pub &'static str);

impl TextureKey {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

/// One textured unit quad. `model` maps the quad's [-0.5, 0.5] square into
/// world space; the renderer applies the camera on top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub model: Mat4,
    pub texture: TextureKey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Hit,
}

/// Per-frame output surface a scene writes into.
///
/// Sprites are ordered front to back. Sound cues queue up until the loop
/// drains them after the tick that produced them.
#[derive(Debug, Default)]
pub struct SceneWorld {
    sprites: Vec<Sprite>,
    sound_cues: Vec<SoundCue>,
}

impl SceneWorld {
    pub fn set_sprites<I>(&mut self, sprites: I)
    where
        I: IntoIterator<Item = Sprite>,
    {
        self.sprites.clear();
        self.sprites.extend(sprites);
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn push_sound_cue(&mut self, cue: SoundCue) {
        self.sound_cues.push(cue);
    }

    pub fn sound_cues(&self) -> &[SoundCue] {
        &self.sound_cues
    }

    pub(crate) fn drain_sound_cues(&mut self) -> std::vec::Drain<'_, SoundCue> {
        self.sound_cues.drain(..)
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.sound_cues.clear();
    }
}

pub trait Scene {
    fn load(&mut self, world: &mut SceneWorld);
    fn update(
        &mut self,
        fixed_dt_seconds: f64,
        input: &InputSnapshot,
        world: &mut SceneWorld,
    ) -> SceneCommand;
    fn unload(&mut self, world: &mut SceneWorld);
    fn debug_title(&self) -> Option<String> {
        None
    }
}

pub(crate) struct SceneRuntime {
    scene: Box<dyn Scene>,
    world: SceneWorld,
    is_loaded: bool,
}

impl SceneRuntime {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            world: SceneWorld::default(),
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load(&mut self.world);
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f64, input: &InputSnapshot) -> SceneCommand {
        self.scene.update(fixed_dt_seconds, input, &mut self.world)
    }

    pub(crate) fn world(&self) -> &SceneWorld {
        &self.world
    }

    pub(crate) fn drain_sound_cues(&mut self) -> std::vec::Drain<'_, SoundCue> {
        self.world.drain_sound_cues()
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title()
    }

    pub(crate) fn shutdown(&mut self) {
        if !self.is_loaded {
            return;
        }
        self.scene.unload(&mut self.world);
        self.world.clear();
        self.is_loaded = false;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;

    struct CountingScene {
        loads: Rc<Cell<u32>>,
        unloads: Rc<Cell<u32>>,
        x: f32,
    }

    impl Scene for CountingScene {
        fn load(&mut self, world: &mut SceneWorld) {
            self.loads.set(self.loads.get() + 1);
            world.set_sprites([Sprite {
                model: Mat4::IDENTITY,
                texture: TextureKey("ship"),
            }]);
        }

        fn update(
            &mut self,
            _fixed_dt_seconds: f64,
            input: &InputSnapshot,
            world: &mut SceneWorld,
        ) -> SceneCommand {
            if input.quit_requested() {
                return SceneCommand::Quit;
            }
            if input.is_down(InputAction::Forward) {
                self.x += 1.0;
                world.push_sound_cue(SoundCue::Hit);
            }
            world.set_sprites([Sprite {
                model: Mat4::from_translation(Vec3::new(self.x, 0.0, 0.0)),
                texture: TextureKey("ship"),
            }]);
            SceneCommand::None
        }

        fn unload(&mut self, _world: &mut SceneWorld) {
            self.unloads.set(self.unloads.get() + 1);
        }

        fn debug_title(&self) -> Option<String> {
            Some(format!("x={}", self.x))
        }
    }

    fn runtime() -> (SceneRuntime, Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let loads = Rc::new(Cell::new(0));
        let unloads = Rc::new(Cell::new(0));
        let runtime = SceneRuntime::new(Box::new(CountingScene {
            loads: Rc::clone(&loads),
            unloads: Rc::clone(&unloads),
            x: 0.0,
        }));
        (runtime, loads, unloads)
    }

    #[test]
    fn load_runs_once() {
        let (mut runtime, loads, _) = runtime();
        runtime.load();
        runtime.load();

        assert_eq!(loads.get(), 1);
        assert_eq!(runtime.world().sprite_count(), 1);
    }

    #[test]
    fn update_replaces_sprites_and_queues_cues() {
        let (mut runtime, _, _) = runtime();
        runtime.load();
        let input = InputSnapshot::empty().with_action_down(InputAction::Forward, true);

        runtime.update(1.0 / 60.0, &input);
        runtime.update(1.0 / 60.0, &input);

        assert_eq!(runtime.world().sprite_count(), 1);
        let translation = runtime.world().sprites()[0].model.w_axis;
        assert!((translation.x - 2.0).abs() < 1e-6);
        assert_eq!(runtime.world().sound_cues(), &[SoundCue::Hit, SoundCue::Hit]);
        assert_eq!(runtime.debug_title().as_deref(), Some("x=2"));
    }

    #[test]
    fn draining_cues_empties_the_queue() {
        let (mut runtime, _, _) = runtime();
        runtime.load();
        let input = InputSnapshot::empty().with_action_down(InputAction::Forward, true);
        runtime.update(1.0 / 60.0, &input);

        let drained: Vec<_> = runtime.drain_sound_cues().collect();

        assert_eq!(drained, vec![SoundCue::Hit]);
        assert!(runtime.world().sound_cues().is_empty());
    }

    #[test]
    fn quit_input_maps_to_quit_command() {
        let (mut runtime, _, _) = runtime();
        runtime.load();
        let input = InputSnapshot::empty().with_quit_requested(true);

        assert_eq!(runtime.update(1.0 / 60.0, &input), SceneCommand::Quit);
    }

    #[test]
    fn shutdown_unloads_loaded_scene_once_and_clears_output() {
        let (mut runtime, _, unloads) = runtime();
        runtime.shutdown();
        assert_eq!(unloads.get(), 0);

        runtime.load();
        runtime.shutdown();
        runtime.shutdown();

        assert_eq!(unloads.get(), 1);
        assert_eq!(runtime.world().sprite_count(), 0);
    }
}
