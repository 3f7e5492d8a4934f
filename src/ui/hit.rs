//! Rectangle hit detection
//!
//! Regions are tested in registration order. Pointer positions arrive in
//! window pixels and are divided by the canvas scale before testing, so all
//! region rects live in canvas space.

use super::Rect;

/// Mouse cursor requested by the region under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Auto,
    Pointer,
    EwResize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Down,
    Up,
    Enter,
    Exit,
}

/// Something that happened to a named region
#[derive(Debug, Clone, PartialEq)]
pub enum HitEvent {
    Enter { region: String },
    Exit { region: String },
    /// Pointer pressed inside; (x, y) in canvas pixels
    Down { region: String, x: f32, y: f32 },
    Up { region: String, x: f32, y: f32 },
}

impl HitEvent {
    pub fn region(&self) -> &str {
        match self {
            HitEvent::Enter { region }
            | HitEvent::Exit { region }
            | HitEvent::Down { region, .. }
            | HitEvent::Up { region, .. } => region,
        }
    }

    pub fn kind(&self) -> HitKind {
        match self {
            HitEvent::Enter { .. } => HitKind::Enter,
            HitEvent::Exit { .. } => HitKind::Exit,
            HitEvent::Down { .. } => HitKind::Down,
            HitEvent::Up { .. } => HitKind::Up,
        }
    }
}

/// A clickable rectangle with the actions it triggers
#[derive(Debug, Clone)]
pub struct HitRegion<A> {
    pub rect: Rect,
    pub over: bool,
    pub cursor: Option<CursorHint>,
    on_down: Vec<A>,
    on_up: Vec<A>,
    on_enter: Vec<A>,
    on_exit: Vec<A>,
}

impl<A> HitRegion<A> {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            over: false,
            cursor: None,
            on_down: Vec::new(),
            on_up: Vec::new(),
            on_enter: Vec::new(),
            on_exit: Vec::new(),
        }
    }

    pub fn with_cursor(mut self, cursor: CursorHint) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn on_down(mut self, action: A) -> Self {
        self.on_down.push(action);
        self
    }

    pub fn on_up(mut self, action: A) -> Self {
        self.on_up.push(action);
        self
    }

    pub fn on_enter(mut self, action: A) -> Self {
        self.on_enter.push(action);
        self
    }

    pub fn on_exit(mut self, action: A) -> Self {
        self.on_exit.push(action);
        self
    }

    pub fn handlers(&self, kind: HitKind) -> &[A] {
        match kind {
            HitKind::Down => &self.on_down,
            HitKind::Up => &self.on_up,
            HitKind::Enter => &self.on_enter,
            HitKind::Exit => &self.on_exit,
        }
    }
}

/// All registered regions, detachable as a whole (modal overlays swap the
/// full set out and back in)
#[derive(Debug, Clone)]
pub struct RegionSet<A> {
    regions: Vec<(String, HitRegion<A>)>,
    unnamed: usize,
}

impl<A> Default for RegionSet<A> {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            unnamed: 0,
        }
    }
}

impl<A> RegionSet<A> {
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|(k, _)| k.as_str())
    }
}

/// Hover/press queries used by draw providers
pub trait PressState {
    fn is_over(&self, region: &str) -> bool;
    fn is_down(&self, region: &str) -> bool;
}

#[derive(Debug, Clone)]
pub struct HitDetector<A> {
    set: RegionSet<A>,
    scale: f32,
    mouse_down: bool,
    cursor: CursorHint,
}

impl<A> Default for HitDetector<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> HitDetector<A> {
    pub fn new() -> Self {
        Self {
            set: RegionSet::default(),
            scale: 1.0,
            mouse_down: false,
            cursor: CursorHint::Auto,
        }
    }

    /// Register a region and return the key it ended up under.
    ///
    /// A taken key gets a numeric suffix (`play`, `play2`, `play3`, ...);
    /// without a key the region is named `region{n}`.
    pub fn add_hit_region(&mut self, region: HitRegion<A>, key: Option<&str>) -> String {
        let key = match key {
            Some(base) => {
                let mut candidate = base.to_string();
                let mut n = 2;
                while self.contains(&candidate) {
                    candidate = format!("{}{}", base, n);
                    n += 1;
                }
                candidate
            }
            None => loop {
                let candidate = format!("region{}", self.set.unnamed);
                self.set.unnamed += 1;
                if !self.contains(&candidate) {
                    break candidate;
                }
            },
        };
        self.set.regions.push((key.clone(), region));
        key
    }

    pub fn remove_hit_region(&mut self, key: &str) -> Option<HitRegion<A>> {
        let idx = self.set.regions.iter().position(|(k, _)| k == key)?;
        Some(self.set.regions.remove(idx).1)
    }

    pub fn clear_hit_regions(&mut self) {
        self.set.regions.clear();
        self.cursor = CursorHint::Auto;
    }

    /// Detach every region, leaving the detector empty
    pub fn take_regions(&mut self) -> RegionSet<A> {
        self.cursor = CursorHint::Auto;
        std::mem::take(&mut self.set)
    }

    /// Put back a set previously returned by `take_regions`, replacing
    /// whatever is registered now
    pub fn restore_regions(&mut self, set: RegionSet<A>) {
        self.set = set;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.region(key).is_some()
    }

    pub fn region(&self, key: &str) -> Option<&HitRegion<A>> {
        self.set.regions.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn region_mut(&mut self, key: &str) -> Option<&mut HitRegion<A>> {
        self.set.regions.iter_mut().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale.max(1.0);
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn is_mouse_down(&self) -> bool {
        self.mouse_down
    }

    /// Force a region's hover flag without emitting events
    pub fn set_over(&mut self, key: &str, over: bool) {
        if let Some(region) = self.region_mut(key) {
            region.over = over;
        }
    }

    fn to_canvas(&self, x: f32, y: f32) -> (f32, f32) {
        (x / self.scale, y / self.scale)
    }

    /// Pointer moved to window position (x, y)
    pub fn mouse_move(&mut self, x: f32, y: f32) -> Vec<HitEvent> {
        let (cx, cy) = self.to_canvas(x, y);
        let mut events = Vec::new();
        let mut cursor = None;

        for (key, region) in self.set.regions.iter_mut() {
            let inside = region.rect.contains(cx, cy);
            if inside && cursor.is_none() {
                cursor = region.cursor;
            }
            if inside && !region.over {
                region.over = true;
                events.push(HitEvent::Enter { region: key.clone() });
            } else if !inside && region.over {
                region.over = false;
                events.push(HitEvent::Exit { region: key.clone() });
            }
        }

        self.cursor = cursor.unwrap_or_default();
        events
    }

    /// Button pressed at window position (x, y). Only the primary button
    /// (0) is handled; hover state is brought up to date first.
    pub fn mouse_down(&mut self, x: f32, y: f32, button: u8) -> Vec<HitEvent> {
        if button != 0 {
            return Vec::new();
        }
        let mut events = self.mouse_move(x, y);
        self.mouse_down = true;

        let (cx, cy) = self.to_canvas(x, y);
        events.extend(
            self.set
                .regions
                .iter()
                .filter(|(_, r)| r.rect.contains(cx, cy))
                .map(|(key, _)| HitEvent::Down {
                    region: key.clone(),
                    x: cx,
                    y: cy,
                }),
        );
        events
    }

    /// Button released at window position (x, y)
    pub fn mouse_up(&mut self, x: f32, y: f32, button: u8) -> Vec<HitEvent> {
        if button != 0 {
            return Vec::new();
        }
        self.mouse_down = false;

        let (cx, cy) = self.to_canvas(x, y);
        self.set
            .regions
            .iter()
            .filter(|(_, r)| r.rect.contains(cx, cy))
            .map(|(key, _)| HitEvent::Up {
                region: key.clone(),
                x: cx,
                y: cy,
            })
            .collect()
    }
}

impl<A: Clone> HitDetector<A> {
    /// Actions subscribed to `event`'s region and kind, in subscription order
    pub fn handlers(&self, event: &HitEvent) -> Vec<A> {
        self.region(event.region())
            .map(|r| r.handlers(event.kind()).to_vec())
            .unwrap_or_default()
    }
}

impl<A> PressState for HitDetector<A> {
    fn is_over(&self, region: &str) -> bool {
        self.region(region).map(|r| r.over).unwrap_or(false)
    }

    fn is_down(&self, region: &str) -> bool {
        self.mouse_down && self.is_over(region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Act {
        Press,
        Release,
        Hover,
        Leave,
    }

    fn detector() -> HitDetector<Act> {
        let mut hits = HitDetector::new();
        let region = HitRegion::new(Rect::new(10.0, 10.0, 20.0, 20.0))
            .on_down(Act::Press)
            .on_up(Act::Release)
            .on_enter(Act::Hover)
            .on_exit(Act::Leave);
        hits.add_hit_region(region, Some("r"));
        hits
    }

    #[test]
    fn test_down_inside_and_outside() {
        let mut hits = detector();
        let events = hits.mouse_down(15.0, 15.0, 0);
        let downs: Vec<&HitEvent> = events.iter().filter(|e| e.kind() == HitKind::Down).collect();
        assert_eq!(downs.len(), 1);
        assert_eq!(hits.handlers(downs[0]), vec![Act::Press]);
        hits.mouse_up(15.0, 15.0, 0);

        let events = hits.mouse_down(31.0, 31.0, 0);
        assert!(events.iter().all(|e| e.kind() != HitKind::Down));
    }

    #[test]
    fn test_overlapping_regions_all_fire() {
        let mut hits: HitDetector<Act> = HitDetector::new();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        hits.add_hit_region(HitRegion::new(rect).on_down(Act::Press).on_up(Act::Release), Some("a"));
        hits.add_hit_region(HitRegion::new(rect).on_down(Act::Hover).on_up(Act::Leave), Some("b"));

        let downs: Vec<HitEvent> = hits
            .mouse_down(5.0, 5.0, 0)
            .into_iter()
            .filter(|e| e.kind() == HitKind::Down)
            .collect();
        assert_eq!(downs.len(), 2);
        let fired: Vec<Act> = downs.iter().flat_map(|e| hits.handlers(e)).collect();
        assert_eq!(fired, vec![Act::Press, Act::Hover]);

        // right and bottom edges are inside
        let ups: Vec<HitEvent> = hits
            .mouse_up(10.0, 10.0, 0)
            .into_iter()
            .filter(|e| e.kind() == HitKind::Up)
            .collect();
        let regions: Vec<&str> = ups.iter().map(|e| e.region()).collect();
        assert_eq!(regions, vec!["a", "b"]);
        let fired: Vec<Act> = ups.iter().flat_map(|e| hits.handlers(e)).collect();
        assert_eq!(fired, vec![Act::Release, Act::Leave]);
    }

    #[test]
    fn test_enter_then_exit_once() {
        let mut hits = detector();
        assert!(hits.mouse_move(0.0, 0.0).is_empty());

        let enter = hits.mouse_move(12.0, 12.0);
        assert_eq!(enter, vec![HitEvent::Enter { region: "r".into() }]);
        assert!(hits.mouse_move(20.0, 20.0).is_empty());
        assert!(hits.is_over("r"));

        let exit = hits.mouse_move(40.0, 40.0);
        assert_eq!(exit, vec![HitEvent::Exit { region: "r".into() }]);
        assert_eq!(hits.handlers(&exit[0]), vec![Act::Leave]);
        assert!(hits.mouse_move(50.0, 50.0).is_empty());
    }

    #[test]
    fn test_key_suffixing() {
        let mut hits: HitDetector<Act> = HitDetector::new();
        let rect = Rect::new(0.0, 0.0, 1.0, 1.0);
        assert_eq!(hits.add_hit_region(HitRegion::new(rect), Some("play")), "play");
        assert_eq!(hits.add_hit_region(HitRegion::new(rect), Some("play")), "play2");
        assert_eq!(hits.add_hit_region(HitRegion::new(rect), Some("play")), "play3");
        assert_eq!(hits.add_hit_region(HitRegion::new(rect), None), "region0");
        assert_eq!(hits.add_hit_region(HitRegion::new(rect), None), "region1");
        assert_eq!(hits.len(), 5);

        assert!(hits.remove_hit_region("play2").is_some());
        assert_eq!(hits.add_hit_region(HitRegion::new(rect), Some("play")), "play2");
        hits.clear_hit_regions();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_scale_divides_pointer() {
        let mut hits = detector();
        hits.set_scale(2.0);
        // window (50, 50) is canvas (25, 25)
        assert_eq!(hits.mouse_move(50.0, 50.0).len(), 1);
        let events = hits.mouse_down(62.0, 62.0, 0);
        assert!(events.iter().any(|e| *e == HitEvent::Exit { region: "r".into() }));
        assert!(events.iter().all(|e| e.kind() != HitKind::Down));
    }

    #[test]
    fn test_secondary_button_ignored() {
        let mut hits = detector();
        assert!(hits.mouse_down(15.0, 15.0, 1).is_empty());
        assert!(!hits.is_mouse_down());
        hits.mouse_down(15.0, 15.0, 0);
        assert!(hits.is_down("r"));
        let ups = hits.mouse_up(15.0, 15.0, 0);
        assert_eq!(hits.handlers(&ups[0]), vec![Act::Release]);
        assert!(!hits.is_down("r"));
    }

    #[test]
    fn test_cursor_first_hint_wins() {
        let mut hits: HitDetector<Act> = HitDetector::new();
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        hits.add_hit_region(HitRegion::new(rect), Some("plain"));
        hits.add_hit_region(HitRegion::new(rect).with_cursor(CursorHint::EwResize), Some("slider"));
        hits.add_hit_region(HitRegion::new(rect).with_cursor(CursorHint::Pointer), Some("button"));

        hits.mouse_move(5.0, 5.0);
        assert_eq!(hits.cursor(), CursorHint::EwResize);
        hits.mouse_move(50.0, 5.0);
        assert_eq!(hits.cursor(), CursorHint::Auto);
    }

    #[test]
    fn test_take_and_restore_regions() {
        let mut hits = detector();
        hits.mouse_move(15.0, 15.0);
        let saved = hits.take_regions();
        assert!(hits.is_empty());
        assert!(!hits.is_over("r"));

        hits.add_hit_region(HitRegion::new(Rect::new(0.0, 0.0, 5.0, 5.0)), Some("modal"));
        hits.restore_regions(saved);
        assert!(hits.contains("r"));
        assert!(!hits.contains("modal"));

        hits.set_over("r", false);
        assert!(!hits.is_over("r"));
    }
}
