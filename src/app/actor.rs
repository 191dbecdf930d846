//! App actor - message loop processing UI events and cell deliveries

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

use crate::app::state::AppState;
use crate::cells::StateHolder;
use crate::config::Config;
use crate::lifecycle::{
    collect_latest_on_lifecycle, collect_on_lifecycle, Lifecycle, LifecycleEvent, LifecycleState,
};
use crate::messages::delivery::PlainRun;
use crate::messages::{Cell, Delivery, RenderState, UiEvent};

const EXPIRY_TICK: Duration = Duration::from_millis(100);

/// App actor that owns the presentation lifecycle and renders cell values
pub struct AppActor {
    state: AppState,
    holder: StateHolder,
    lifecycle: Lifecycle,
    toast_duration: Duration,
    delivery_tx: mpsc::UnboundedSender<Delivery>,
    delivery_rx: mpsc::UnboundedReceiver<Delivery>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    /// Create the surface and subscribe to every cell except the plain stream
    pub fn new(
        holder: StateHolder,
        config: &Config,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        let (delivery_tx, delivery_rx) = mpsc::unbounded_channel();
        let lifecycle = Lifecycle::new();
        lifecycle.handle(LifecycleEvent::Create);

        let actor = AppActor {
            state: AppState::new(),
            holder,
            lifecycle,
            toast_duration: config.notification_duration(),
            delivery_tx,
            delivery_rx,
            render_tx,
        };
        actor.subscribe_to_cells();
        actor
    }

    fn subscribe_to_cells(&self) {
        let tx = self.delivery_tx.clone();
        self.holder.live_value().observe(&self.lifecycle, move |text| {
            let _ = tx.send(Delivery::text(Cell::Live, text));
        });

        let tx = self.delivery_tx.clone();
        collect_latest_on_lifecycle(
            &self.lifecycle,
            LifecycleState::Started,
            self.holder.state_value(),
            move |text| {
                let _ = tx.send(Delivery::text(Cell::State, text));
            },
        );

        let tx = self.delivery_tx.clone();
        collect_on_lifecycle(
            &self.lifecycle,
            LifecycleState::Started,
            self.holder.event_stream(),
            move |text: String| {
                tracing::debug!(%text, "Event received");
                let _ = tx.send(Delivery::text(Cell::Event, text.clone()));
                let _ = tx.send(Delivery::Notify(text));
            },
        );
    }

    /// Run the actor message loop
    pub async fn run(mut self, mut ui_rx: mpsc::UnboundedReceiver<UiEvent>) {
        self.enter_foreground();
        let _ = self.render_tx.send(self.state.to_render_state());

        let mut expiry = tokio::time::interval(EXPIRY_TICK);
        expiry.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    let quit = match event {
                        Some(event) => self.handle_ui_event(event),
                        None => true,
                    };
                    if quit {
                        self.transition(LifecycleEvent::Destroy);
                        let _ = self.render_tx.send(self.state.to_render_state());
                        break;
                    }
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                Some(delivery) = self.delivery_rx.recv() => {
                    tracing::debug!(?delivery, "Delivery");
                    self.state.apply(delivery, Instant::now(), self.toast_duration);
                    let _ = self.render_tx.send(self.state.to_render_state());
                }
                _ = expiry.tick() => {
                    if self.state.expire_notification(Instant::now()) {
                        let _ = self.render_tx.send(self.state.to_render_state());
                    }
                }
            }
        }
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::TriggerLiveValue => self.holder.trigger_live_value(),
            UiEvent::TriggerStateValue => self.holder.trigger_state_value(),
            UiEvent::TriggerPlainStream => self.collect_plain_stream(),
            UiEvent::TriggerEventStream => self.holder.trigger_event_stream(),

            UiEvent::SelectNext => self.state.select_next(),
            UiEvent::SelectPrev => self.state.select_prev(),
            UiEvent::PressSelected => {
                let event = self.state.selected.trigger_event();
                return self.handle_ui_event(event);
            }

            UiEvent::Foreground => self.enter_foreground(),
            UiEvent::Background => self.enter_background(),
            UiEvent::ToggleForeground => {
                if self.lifecycle.state().is_at_least(LifecycleState::Started) {
                    self.enter_background();
                } else {
                    self.enter_foreground();
                }
            }

            UiEvent::ToggleHelp => self.state.toggle_help(),
            UiEvent::CloseHelp => self.state.close_help(),

            UiEvent::Quit => return true,
        }

        false
    }

    /// Collect a fresh plain stream for as long as the surface stays started
    fn collect_plain_stream(&self) {
        let items = self.holder.trigger_plain_stream();
        let run = PlainRun::start(self.delivery_tx.clone());
        let launched = self.lifecycle.launch_while(LifecycleState::Started, async move {
            futures_util::pin_mut!(items);
            while let Some(item) = items.next().await {
                run.send(item);
            }
        });
        if launched.is_none() {
            tracing::debug!("Surface not started, plain stream not collected");
        }
    }

    fn enter_foreground(&mut self) {
        self.transition(LifecycleEvent::Start);
        self.transition(LifecycleEvent::Resume);
    }

    fn enter_background(&mut self) {
        self.transition(LifecycleEvent::Pause);
        self.transition(LifecycleEvent::Stop);
    }

    fn transition(&mut self, event: LifecycleEvent) {
        self.state.lifecycle = self.lifecycle.handle(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::StreamSettings;

    struct Harness {
        ui_tx: mpsc::UnboundedSender<UiEvent>,
        render_rx: mpsc::UnboundedReceiver<RenderState>,
        last: RenderState,
    }

    impl Harness {
        fn start() -> Self {
            let config = Config::default();
            let holder = StateHolder::new(StreamSettings::default());
            let (ui_tx, ui_rx) = mpsc::unbounded_channel();
            let (render_tx, render_rx) = mpsc::unbounded_channel();
            let actor = AppActor::new(holder, &config, render_tx);
            tokio::spawn(actor.run(ui_rx));
            Harness {
                ui_tx,
                render_rx,
                last: RenderState::default(),
            }
        }

        fn send(&self, event: UiEvent) {
            self.ui_tx.send(event).unwrap();
        }

        /// Let virtual time pass, keeping every render seen along the way
        async fn advance(&mut self, by: Duration) -> Vec<RenderState> {
            tokio::time::sleep(by).await;
            let mut seen = Vec::new();
            while let Ok(state) = self.render_rx.try_recv() {
                seen.push(state.clone());
                self.last = state;
            }
            seen
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_values_rendered_once_started() {
        let mut ui = Harness::start();
        ui.advance(Duration::from_millis(10)).await;
        assert_eq!(ui.last.lifecycle, LifecycleState::Resumed);
        assert_eq!(ui.last.live_text, "Hello World");
        assert_eq!(ui.last.state_text, "Hello World");
        assert_eq!(ui.last.plain_text, "");
        assert_eq!(ui.last.event_text, "");
    }

    #[tokio::test(start_paused = true)]
    async fn test_button_scenario() {
        let mut ui = Harness::start();
        ui.advance(Duration::from_millis(10)).await;

        ui.send(UiEvent::TriggerLiveValue);
        ui.advance(Duration::from_millis(10)).await;
        assert_eq!(ui.last.live_text, "LiveData");

        ui.send(UiEvent::TriggerStateValue);
        ui.advance(Duration::from_millis(10)).await;
        assert_eq!(ui.last.state_text, "StateFlow");

        ui.send(UiEvent::TriggerPlainStream);
        let renders = ui.advance(Duration::from_millis(5500)).await;
        let mut shown: Vec<String> = renders.iter().map(|r| r.plain_text.clone()).collect();
        shown.dedup();
        shown.retain(|t| !t.is_empty());
        assert_eq!(shown, vec!["Item 0", "Item 1", "Item 2", "Item 3", "Item 4"]);
        assert_eq!(ui.last.plain_runs, 0);

        ui.send(UiEvent::TriggerEventStream);
        ui.advance(Duration::from_millis(10)).await;
        assert_eq!(ui.last.event_text, "SharedFlow");
        assert_eq!(ui.last.notification.as_deref(), Some("SharedFlow"));
        assert_eq!(ui.last.notifications_shown, 1);

        ui.advance(Duration::from_secs(3)).await;
        assert_eq!(ui.last.notification, None);
        assert_eq!(ui.last.notifications_shown, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_event_is_not_deduplicated() {
        let mut ui = Harness::start();
        ui.advance(Duration::from_millis(10)).await;

        ui.send(UiEvent::TriggerEventStream);
        ui.send(UiEvent::TriggerEventStream);
        ui.advance(Duration::from_millis(10)).await;
        assert_eq!(ui.last.notifications_shown, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_cancels_plain_stream_and_gates_values() {
        let mut ui = Harness::start();
        ui.advance(Duration::from_millis(10)).await;

        ui.send(UiEvent::TriggerPlainStream);
        ui.advance(Duration::from_millis(1500)).await;
        assert_eq!(ui.last.plain_text, "Item 1");
        assert_eq!(ui.last.plain_runs, 1);

        ui.send(UiEvent::Background);
        ui.advance(Duration::from_millis(10)).await;
        assert_eq!(ui.last.lifecycle, LifecycleState::Created);
        assert_eq!(ui.last.plain_runs, 0);

        // triggers still write the cells while backgrounded, events are lost
        ui.send(UiEvent::TriggerLiveValue);
        ui.send(UiEvent::TriggerStateValue);
        ui.send(UiEvent::TriggerEventStream);
        ui.advance(Duration::from_secs(5)).await;
        assert_eq!(ui.last.plain_text, "Item 1");
        assert_eq!(ui.last.live_text, "Hello World");
        assert_eq!(ui.last.state_text, "Hello World");
        assert_eq!(ui.last.event_text, "");

        ui.send(UiEvent::Foreground);
        ui.advance(Duration::from_millis(10)).await;
        assert_eq!(ui.last.live_text, "LiveData");
        assert_eq!(ui.last.state_text, "StateFlow");
        assert_eq!(ui.last.event_text, "");
        assert_eq!(ui.last.notifications_shown, 0);
        assert_eq!(ui.last.plain_text, "Item 1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_buttons_can_be_pressed_by_selection() {
        let mut ui = Harness::start();
        ui.advance(Duration::from_millis(10)).await;

        ui.send(UiEvent::SelectNext);
        ui.send(UiEvent::PressSelected);
        ui.advance(Duration::from_millis(10)).await;
        assert_eq!(ui.last.selected, Cell::State);
        assert_eq!(ui.last.state_text, "StateFlow");
        assert_eq!(ui.last.live_text, "Hello World");
    }

    #[tokio::test(start_paused = true)]
    async fn test_quit_destroys_surface() {
        let mut ui = Harness::start();
        ui.advance(Duration::from_millis(10)).await;

        ui.send(UiEvent::Quit);
        ui.advance(Duration::from_millis(10)).await;
        assert_eq!(ui.last.lifecycle, LifecycleState::Destroyed);
        assert!(ui.ui_tx.send(UiEvent::TriggerLiveValue).is_err());
    }
}
