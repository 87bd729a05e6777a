use crate::frame::Frame;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    CityPlaced,
    CityUpdated,
    ResourceReady,
    ResourceFailed,
    TrackingFound,
    TrackingLost,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::CityPlaced => "city.placed",
            EventKind::CityUpdated => "city.updated",
            EventKind::ResourceReady => "resource.ready",
            EventKind::ResourceFailed => "resource.failed",
            EventKind::TrackingFound => "tracking.found",
            EventKind::TrackingLost => "tracking.lost",
        }
    }
}

/// Session event, stamped with the frame it happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: EventKind, message: impl Into<String>) {
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, EventKind};
    use crate::frame::Frame;

    #[test]
    fn records_events_with_frame_index() {
        let mut bus = EventBus::new();
        let f = Frame::first().advance(0.1).advance(0.1);
        bus.emit(f, EventKind::CityPlaced, "Paris");
        assert_eq!(bus.events().len(), 1);
        assert_eq!(bus.events()[0].frame_index, 2);
        assert_eq!(bus.count(EventKind::CityPlaced), 1);
        assert_eq!(bus.count(EventKind::TrackingLost), 0);
    }

    #[test]
    fn drain_clears_events() {
        let mut bus = EventBus::new();
        bus.emit(Frame::first(), EventKind::ResourceReady, "font");
        let drained = bus.drain();
        assert_eq!(drained.len(), 1);
        assert!(bus.events().is_empty());
    }
}
