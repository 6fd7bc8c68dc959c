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

//! Metron sandbox: a point orbiting at a fixed 60 Hz simulation rate,
//! presented through a log-only backend at whatever rate the sync stage
//! paces. Render output interpolates between the two most recent simulation
//! states, so the orbit stays smooth even though presentation and logic run
//! at different rates. Stop with Ctrl-C.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use metron_core::backend::{BackendError, ClearColor, GuiBackend, GuiPanel, RenderBackend};
use metron_core::{
    LogObserver, LogicStage, Pipeline, PipelineConfig, RenderStage, ShutdownToken, SyncStage,
};

const ORBIT_RADIUS: f32 = 5.0;

/// Snapshot of the simulation written once per logic tick.
#[derive(Debug, Clone, Copy, Default)]
struct OrbitFrame {
    x: f32,
    y: f32,
    tick: u64,
}

/// Authoritative simulation state; the frame ring only holds snapshots.
struct OrbitState {
    angle: f32,
    angular_velocity: f32,
    ticks: u64,
}

struct OrbitLogic;

#[async_trait(?Send)]
impl LogicStage<OrbitFrame, OrbitState> for OrbitLogic {
    async fn tick(
        &mut self,
        _token: &ShutdownToken,
        fixed_dt: f32,
        frame: &mut OrbitFrame,
        state: &mut OrbitState,
    ) -> Result<()> {
        state.angle = (state.angle + state.angular_velocity * fixed_dt) % std::f32::consts::TAU;
        state.ticks += 1;
        *frame = OrbitFrame {
            x: state.angle.cos() * ORBIT_RADIUS,
            y: state.angle.sin() * ORBIT_RADIUS,
            tick: state.ticks,
        };
        Ok(())
    }
}

/// Log-only presentation backend.
#[derive(Default)]
struct ConsoleBackend {
    presented: u64,
}

#[async_trait(?Send)]
impl RenderBackend for ConsoleBackend {
    async fn clear_screen(&mut self, color: ClearColor) -> Result<(), BackendError> {
        log::trace!("clear rgba({}, {}, {}, {})", color.r, color.g, color.b, color.a);
        Ok(())
    }

    async fn present(&mut self) -> Result<(), BackendError> {
        self.presented += 1;
        Ok(())
    }
}

/// Blends the two most recent simulation states and draws the result.
struct InterpolatedView {
    backend: Rc<RefCell<ConsoleBackend>>,
}

#[async_trait(?Send)]
impl RenderStage<OrbitFrame> for InterpolatedView {
    async fn render(
        &mut self,
        _token: &ShutdownToken,
        alpha: f32,
        previous: &OrbitFrame,
        current: &OrbitFrame,
    ) -> Result<()> {
        let x = previous.x + (current.x - previous.x) * alpha;
        let y = previous.y + (current.y - previous.y) * alpha;
        self.backend.borrow_mut().clear_screen(ClearColor::BLACK).await?;
        log::debug!("orbit at ({x:.2}, {y:.2}), alpha {alpha:.2}");
        Ok(())
    }
}

/// The UI handle the console GUI hands to its panels.
#[derive(Default)]
struct TextUi {
    lines: Vec<String>,
}

/// Immediate-mode GUI backend that renders panels as log lines.
#[derive(Default)]
struct ConsoleGui {
    ui: TextUi,
}

impl GuiBackend for ConsoleGui {
    fn new_frame(&mut self) {
        self.ui = TextUi::default();
    }

    fn draw(&mut self, panel: &mut dyn GuiPanel) {
        panel.draw(&mut self.ui);
    }

    fn render(&mut self) -> Result<(), BackendError> {
        for line in &self.ui.lines {
            log::trace!("hud: {line}");
        }
        Ok(())
    }
}

#[derive(Default)]
struct StatsPanel {
    last_tick: u64,
}

impl GuiPanel for StatsPanel {
    fn draw(&mut self, ui: &mut dyn Any) {
        if let Some(ui) = ui.downcast_mut::<TextUi>() {
            ui.lines.push(format!("simulation tick {}", self.last_tick));
        }
    }
}

/// Draws the HUD overlay after the scene view.
struct HudStage {
    gui: ConsoleGui,
    panel: StatsPanel,
}

#[async_trait(?Send)]
impl RenderStage<OrbitFrame> for HudStage {
    async fn render(
        &mut self,
        _token: &ShutdownToken,
        _alpha: f32,
        _previous: &OrbitFrame,
        current: &OrbitFrame,
    ) -> Result<()> {
        self.panel.last_tick = current.tick;
        self.gui.new_frame();
        self.gui.draw(&mut self.panel);
        self.gui.render()?;
        Ok(())
    }
}

/// Presents the frame and paces the loop.
struct PresentSync {
    backend: Rc<RefCell<ConsoleBackend>>,
    pace: Duration,
}

#[async_trait(?Send)]
impl SyncStage<OrbitState> for PresentSync {
    async fn sync(&mut self, token: &ShutdownToken, _state: &mut OrbitState) -> Result<()> {
        self.backend.borrow_mut().present().await?;
        if !token.is_stop_requested() {
            tokio::time::sleep(self.pace).await;
        }
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = PipelineConfig {
        fixed_hz: 60,
        frame_history: 3,
        logic_slots: 1,
        render_slots: 2,
        max_catch_up_ticks: Some(8),
    };

    let backend = Rc::new(RefCell::new(ConsoleBackend::default()));
    let mut pipeline = Pipeline::builder(
        config,
        OrbitFrame::default(),
        OrbitState {
            angle: 0.0,
            angular_velocity: 1.0,
            ticks: 0,
        },
    )
    .logic_slot(0, OrbitLogic)
    .render_slot(
        0,
        InterpolatedView {
            backend: backend.clone(),
        },
    )
    .render_slot(
        1,
        HudStage {
            gui: ConsoleGui::default(),
            panel: StatsPanel::default(),
        },
    )
    .sync_stage(PresentSync {
        backend: backend.clone(),
        pace: Duration::from_millis(4),
    })
    .observer(LogObserver::new())
    .build()?;

    let token = ShutdownToken::new();
    let signal_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.request_stop();
        }
    });

    log::info!("sandbox running at 60 Hz logic, Ctrl-C to stop");
    pipeline.run_loop(token).await?;

    log::info!(
        "stopped after {} simulation ticks, {} presented frames",
        pipeline.state().ticks,
        backend.borrow().presented
    );
    Ok(())
}
