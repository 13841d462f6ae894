// Desktop preview window: original / per-channel / combined panels, a status
// line and keyboard shortcuts. Files are picked by drag-and-drop onto the
// window or on the command line.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::ui::Display;
use bevy::window::FileDragAndDrop;
use image::RgbaImage;

use super::state::{SdfRequest, SdfWorkspace, StatusLevel, StatusLine};
use crate::core::config::SdfConfig;
use crate::core::preview::thumbnail;

pub struct SdfUiPlugin;

impl Plugin for SdfUiPlugin {
    fn build(&self, app: &mut App) {
        let preview = app
            .world()
            .get_resource::<SdfConfig>()
            .map(|c| c.preview.clone())
            .unwrap_or_default();
        app.insert_resource(PreviewSettings {
            show_channels: preview.show_channels,
            thumbnail_size: preview.thumbnail_size.max(1),
        })
        .init_resource::<PreviewCache>()
        .add_systems(Startup, spawn_ui)
        .add_systems(
            Update,
            (
                (keyboard_shortcuts, file_drop),
                (refresh_previews, apply_panel_visibility, sync_status_text, sync_help_text),
            )
                .chain(),
        );
    }
}

#[derive(Resource, Debug, Clone)]
pub struct PreviewSettings {
    pub show_channels: bool,
    pub thumbnail_size: u32,
}

/// Handles currently shown in each panel plus the session revision they came from.
#[derive(Resource, Default)]
struct PreviewCache {
    revision: Option<u64>,
    original: Handle<Image>,
    red: Handle<Image>,
    green: Handle<Image>,
    combined: Handle<Image>,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum PreviewSlot {
    Original,
    Red,
    Green,
    Combined,
}

impl PreviewSlot {
    const ALL: [PreviewSlot; 4] = [PreviewSlot::Original, PreviewSlot::Red, PreviewSlot::Green, PreviewSlot::Combined];

    fn title(self) -> &'static str {
        match self {
            PreviewSlot::Original => "Original",
            PreviewSlot::Red => "R channel (right light)",
            PreviewSlot::Green => "G channel (left light)",
            PreviewSlot::Combined => "Combined",
        }
    }

    fn is_channel_view(self) -> bool {
        matches!(self, PreviewSlot::Red | PreviewSlot::Green)
    }
}

#[derive(Component)]
struct PreviewPanel(PreviewSlot);
#[derive(Component)]
struct StatusText;
#[derive(Component)]
struct HelpText;

fn spawn_ui(mut commands: Commands, settings: Res<PreviewSettings>) {
    commands.spawn(Camera2d);
    let panel_px = settings.thumbnail_size as f32 + 24.0;

    let root = commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(16.0)),
                row_gap: Val::Px(10.0),
                ..default()
            },
            BackgroundColor(Color::srgb(0.09, 0.09, 0.11)),
        ))
        .id();

    commands.entity(root).with_children(|p| {
        p.spawn((
            Text::new("SDF Texture Maker"),
            TextFont { font_size: 26.0, ..default() },
        ));
        p.spawn((HelpText, Text::new(""), TextFont { font_size: 14.0, ..default() }));
        p.spawn((StatusText, Text::new("Drop a gradient image onto the window"), TextFont { font_size: 16.0, ..default() }));
        p.spawn(Node {
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::Wrap,
            column_gap: Val::Px(12.0),
            row_gap: Val::Px(12.0),
            ..default()
        })
        .with_children(|grid| {
            for slot in PreviewSlot::ALL {
                grid.spawn((
                    PreviewPanel(slot),
                    Node {
                        width: Val::Px(panel_px),
                        min_height: Val::Px(panel_px + 28.0),
                        flex_direction: FlexDirection::Column,
                        align_items: AlignItems::Center,
                        padding: UiRect::all(Val::Px(8.0)),
                        row_gap: Val::Px(6.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.15, 0.15, 0.18)),
                ))
                .with_children(|panel| {
                    panel.spawn((Text::new(slot.title()), TextFont { font_size: 14.0, ..default() }));
                    panel.spawn((slot, ImageNode::default()));
                });
            }
        });
    });
}

fn keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    ws: Res<SdfWorkspace>,
    mut settings: ResMut<PreviewSettings>,
    mut requests: EventWriter<SdfRequest>,
) {
    if ws.awaiting_overwrite.is_some() {
        if keys.just_pressed(KeyCode::KeyY) {
            requests.write(SdfRequest::ConfirmOverwrite(true));
        } else if keys.just_pressed(KeyCode::KeyN) || keys.just_pressed(KeyCode::Escape) {
            requests.write(SdfRequest::ConfirmOverwrite(false));
        }
        return;
    }
    if keys.just_pressed(KeyCode::KeyG) {
        requests.write(SdfRequest::Generate);
    }
    if keys.just_pressed(KeyCode::KeyS) {
        requests.write(SdfRequest::Save);
    }
    if keys.just_pressed(KeyCode::KeyW) {
        requests.write(SdfRequest::SetAutoUpdate(!ws.auto_update));
    }
    if keys.just_pressed(KeyCode::KeyC) {
        settings.show_channels = !settings.show_channels;
    }
}

fn file_drop(mut drops: EventReader<FileDragAndDrop>, mut requests: EventWriter<SdfRequest>) {
    for ev in drops.read() {
        if let FileDragAndDrop::DroppedFile { path_buf, .. } = ev {
            requests.write(SdfRequest::Load(path_buf.clone()));
        }
    }
}

fn refresh_previews(
    ws: Res<SdfWorkspace>,
    settings: Res<PreviewSettings>,
    mut cache: ResMut<PreviewCache>,
    mut images: ResMut<Assets<Image>>,
    mut q_slots: Query<(&PreviewSlot, &mut ImageNode)>,
) {
    let session = &ws.session;
    let revision = session.revision();
    if cache.revision == Some(revision) && !settings.is_changed() {
        return;
    }
    let (Some(source), Some(views)) = (session.source(), session.preview_channels()) else {
        return;
    };
    let mut upload = |img: &RgbaImage| -> Handle<Image> {
        match to_bevy_image(&thumbnail(img, settings.thumbnail_size)) {
            Some(image) => images.add(image),
            None => Handle::default(),
        }
    };
    cache.original = upload(source.image());
    cache.combined = upload(&views.combined);
    if settings.show_channels {
        cache.red = upload(&views.red);
        cache.green = upload(&views.green);
    }
    cache.revision = Some(revision);

    for (slot, mut node) in &mut q_slots {
        node.image = match slot {
            PreviewSlot::Original => cache.original.clone(),
            PreviewSlot::Red => cache.red.clone(),
            PreviewSlot::Green => cache.green.clone(),
            PreviewSlot::Combined => cache.combined.clone(),
        };
    }
}

fn apply_panel_visibility(settings: Res<PreviewSettings>, mut q_panels: Query<(&PreviewPanel, &mut Node)>) {
    if !settings.is_changed() {
        return;
    }
    for (panel, mut node) in &mut q_panels {
        node.display = if panel.0.is_channel_view() && !settings.show_channels {
            Display::None
        } else {
            Display::Flex
        };
    }
}

fn sync_status_text(status: Res<StatusLine>, mut q_text: Query<(&mut Text, &mut TextColor), With<StatusText>>) {
    if !status.is_changed() {
        return;
    }
    let Ok((mut text, mut color)) = q_text.single_mut() else { return; };
    if text.as_str() != status.message {
        *text = Text::new(status.message.clone());
    }
    color.0 = match status.level {
        StatusLevel::Info => Color::srgb(0.85, 0.85, 0.85),
        StatusLevel::Warning => Color::srgb(0.95, 0.75, 0.3),
        StatusLevel::Error => Color::srgb(0.95, 0.35, 0.35),
    };
}

fn sync_help_text(
    ws: Res<SdfWorkspace>,
    settings: Res<PreviewSettings>,
    mut q_text: Query<&mut Text, With<HelpText>>,
) {
    if !ws.is_changed() && !settings.is_changed() {
        return;
    }
    let Ok(mut text) = q_text.single_mut() else { return; };
    let on_off = |b: bool| if b { "on" } else { "off" };
    let output = ws
        .output_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".into());
    let s = format!(
        "[G] generate  [S] save  [W] auto-update: {}  [C] channel preview: {}\nOutput: {}",
        on_off(ws.auto_update),
        on_off(settings.show_channels),
        output
    );
    if text.as_str() != s {
        *text = Text::new(s);
    }
}

fn to_bevy_image(img: &RgbaImage) -> Option<Image> {
    if img.width() == 0 || img.height() == 0 {
        return None;
    }
    Some(Image::new(
        Extent3d {
            width: img.width(),
            height: img.height(),
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        img.as_raw().clone(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    ))
}
