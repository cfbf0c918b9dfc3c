//! ui.rs
//!
//! Parameter panel. Shows the sun angles and the two atmosphere colors, keyboard to tweak:
//!   up / down      sun polar angle
//!   left / right   sun azimuth
//!   q / a          day color hue
//!   w / s          day color saturation
//!   e / d          day color lightness
//!   u / j          twilight color hue
//!   i / k          twilight color saturation
//!   o / l          twilight color lightness
//!   r              reset to the values the app started with

use bevy::prelude::*;

use crate::systems::earth::ShadingSync;
use crate::systems::params::EarthParameters;
use crate::systems::sun::SunSpherical;

// radians per second while a key is held
const ANGLE_SPEED: f32 = 0.8;
// degrees of hue per second while a key is held
const HUE_SPEED: f32 = 90.0;
// saturation / lightness units per second
const TONE_SPEED: f32 = 0.5;

pub struct ParameterPanelPlugin;

impl Plugin for ParameterPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (capture_defaults, setup_ui))
           .add_systems(Update, (
               handle_keys.before(ShadingSync),
               update_readout.run_if(panel_inputs_changed),
           ));
    }
}

/// what reset goes back to, taken from the state at startup (cli angles and colors included)
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct PanelDefaults {
    pub sun: SunSpherical,
    pub parameters: EarthParameters,
}

/// one edit of a color in hsl space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColorTweak {
    /// degrees
    Hue(f32),
    Saturation(f32),
    Lightness(f32),
}

impl ColorTweak {
    pub fn apply(self, color: Srgba) -> Hsla {
        let hsla = Hsla::from(Color::from(color));
        match self {
            ColorTweak::Hue(degrees) => hsla.rotate_hue(degrees),
            ColorTweak::Saturation(delta) => Hsla {
                saturation: (hsla.saturation + delta).clamp(0.0, 1.0),
                ..hsla
            },
            ColorTweak::Lightness(delta) => Hsla {
                lightness: (hsla.lightness + delta).clamp(0.0, 1.0),
                ..hsla
            },
        }
    }
}

/// one tweak coming from the panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamAction {
    Polar(f32),
    Azimuth(f32),
    DayColor(ColorTweak),
    TwilightColor(ColorTweak),
    Reset,
}

/// applies a tweak to the shared state, the earth plugin then pushes it into both materials
pub fn apply_action(
    action: ParamAction,
    sun: &mut SunSpherical,
    parameters: &mut EarthParameters,
    defaults: &PanelDefaults,
) {
    match action {
        ParamAction::Polar(delta) => sun.set_angles(sun.polar() + delta, sun.azimuth()),
        ParamAction::Azimuth(delta) => sun.set_angles(sun.polar(), sun.azimuth() + delta),
        ParamAction::DayColor(tweak) => {
            let color = tweak.apply(parameters.atmosphere_day_color());
            parameters.set_atmosphere_day_color(color);
        }
        ParamAction::TwilightColor(tweak) => {
            let color = tweak.apply(parameters.atmosphere_twilight_color());
            parameters.set_atmosphere_twilight_color(color);
        }
        ParamAction::Reset => {
            *sun = defaults.sun;
            *parameters = defaults.parameters;
        }
    }
}

// held keys -> actions for this frame
pub fn collect_actions(keys: &ButtonInput<KeyCode>, delta_secs: f32) -> Vec<ParamAction> {
    let mut actions = Vec::new();
    let angle = ANGLE_SPEED * delta_secs;
    let hue = HUE_SPEED * delta_secs;
    let tone = TONE_SPEED * delta_secs;

    let held = [
        (KeyCode::ArrowUp, ParamAction::Polar(-angle)),
        (KeyCode::ArrowDown, ParamAction::Polar(angle)),
        (KeyCode::ArrowLeft, ParamAction::Azimuth(-angle)),
        (KeyCode::ArrowRight, ParamAction::Azimuth(angle)),
        (KeyCode::KeyQ, ParamAction::DayColor(ColorTweak::Hue(hue))),
        (KeyCode::KeyA, ParamAction::DayColor(ColorTweak::Hue(-hue))),
        (KeyCode::KeyW, ParamAction::DayColor(ColorTweak::Saturation(tone))),
        (KeyCode::KeyS, ParamAction::DayColor(ColorTweak::Saturation(-tone))),
        (KeyCode::KeyE, ParamAction::DayColor(ColorTweak::Lightness(tone))),
        (KeyCode::KeyD, ParamAction::DayColor(ColorTweak::Lightness(-tone))),
        (KeyCode::KeyU, ParamAction::TwilightColor(ColorTweak::Hue(hue))),
        (KeyCode::KeyJ, ParamAction::TwilightColor(ColorTweak::Hue(-hue))),
        (KeyCode::KeyI, ParamAction::TwilightColor(ColorTweak::Saturation(tone))),
        (KeyCode::KeyK, ParamAction::TwilightColor(ColorTweak::Saturation(-tone))),
        (KeyCode::KeyO, ParamAction::TwilightColor(ColorTweak::Lightness(tone))),
        (KeyCode::KeyL, ParamAction::TwilightColor(ColorTweak::Lightness(-tone))),
    ];
    for (key, action) in held {
        if keys.pressed(key) {
            actions.push(action);
        }
    }

    if keys.just_pressed(KeyCode::KeyR) {
        actions.push(ParamAction::Reset);
    }

    actions
}

fn capture_defaults(
    mut commands: Commands,
    sun: Res<SunSpherical>,
    parameters: Res<EarthParameters>,
) {
    commands.insert_resource(PanelDefaults {
        sun: *sun,
        parameters: *parameters,
    });
}

// readout components
#[derive(Component)]
pub struct SunReadout;

#[derive(Component)]
pub struct DayColorReadout;

#[derive(Component)]
pub struct TwilightColorReadout;

fn setup_ui(mut commands: Commands) {
    // create UI container
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::End,
                justify_content: JustifyContent::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            BackgroundColor(Color::NONE),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("sun: -"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                SunReadout,
            ));

            parent.spawn((
                Text::new("atmosphereDayColor: -"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                DayColorReadout,
                Node {
                    margin: UiRect::top(Val::Px(5.0)), // spacing
                    ..default()
                },
            ));

            parent.spawn((
                Text::new("atmosphereTwilightColor: -"),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                TwilightColorReadout,
                Node {
                    margin: UiRect::top(Val::Px(5.0)),
                    ..default()
                },
            ));

            parent.spawn((
                Text::new("arrows: sun   q/a w/s e/d: day h/s/l   u/j i/k o/l: twilight h/s/l   r: reset"),
                TextFont {
                    font_size: 11.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.6)),
                Node {
                    margin: UiRect::top(Val::Px(10.0)),
                    ..default()
                },
            ));
        });
}

fn handle_keys(
    keys: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    mut sun: ResMut<SunSpherical>,
    mut parameters: ResMut<EarthParameters>,
    defaults: Res<PanelDefaults>,
) {
    let actions = collect_actions(&keys, time.delta_secs());
    if actions.is_empty() {
        return; // don't touch the resources, change detection drives the sync
    }

    for action in actions {
        apply_action(action, &mut sun, &mut parameters, &defaults);
    }
}

fn panel_inputs_changed(sun: Res<SunSpherical>, parameters: Res<EarthParameters>) -> bool {
    sun.is_changed() || parameters.is_changed()
}

fn update_readout(
    sun: Res<SunSpherical>,
    parameters: Res<EarthParameters>,
    mut sun_query: Query<&mut Text, (With<SunReadout>, Without<DayColorReadout>, Without<TwilightColorReadout>)>,
    mut day_query: Query<(&mut Text, &mut TextColor), (With<DayColorReadout>, Without<TwilightColorReadout>)>,
    mut twilight_query: Query<(&mut Text, &mut TextColor), (With<TwilightColorReadout>, Without<DayColorReadout>)>,
) {
    if let Ok(mut text) = sun_query.single_mut() {
        text.0 = format!("sun: phi {:.2}  theta {:.2}", sun.polar(), sun.azimuth());
    }

    let day = parameters.atmosphere_day_color();
    if let Ok((mut text, mut color)) = day_query.single_mut() {
        text.0 = format!("atmosphereDayColor: {}", day.to_hex());
        color.0 = day.into();
    }

    let twilight = parameters.atmosphere_twilight_color();
    if let Ok((mut text, mut color)) = twilight_query.single_mut() {
        text.0 = format!("atmosphereTwilightColor: {}", twilight.to_hex());
        color.0 = twilight.into();
    }
}
