use super::*;

/// In-memory host that records registrations. Shared with the recognizer and
/// drag coordinator tests.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    next_id: u64,
    pub(crate) active: Vec<(ListenerId, ListenerScope, PointerEventKind)>,
    pub(crate) removed: Vec<ListenerId>,
    /// Fail the n-th listen call (0-based) if set.
    pub(crate) fail_at: Option<usize>,
    calls: usize,
}

impl RecordingHost {
    pub(crate) fn kinds(&self) -> Vec<(ListenerScope, PointerEventKind)> {
        self.active.iter().map(|&(_, scope, kind)| (scope, kind)).collect()
    }
}

impl ListenerHost for RecordingHost {
    fn listen(&mut self, scope: ListenerScope, kind: PointerEventKind) -> Result<ListenerId, BindingError> {
        let call = self.calls;
        self.calls += 1;
        if self.fail_at == Some(call) {
            return Err(BindingError::Listen { scope, kind, reason: "refused".into() });
        }
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.active.push((id, scope, kind));
        Ok(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.active.retain(|&(active, _, _)| active != id);
        self.removed.push(id);
    }
}

const WANTED: [(ListenerScope, PointerEventKind); 3] = [
    (ListenerScope::Element, PointerEventKind::Press),
    (ListenerScope::Document, PointerEventKind::Move),
    (ListenerScope::Document, PointerEventKind::Release),
];

#[test]
fn attach_registers_each_listener() {
    let mut host = RecordingHost::default();
    let mut binding = Binding::new();
    assert!(binding.attach(&mut host, &WANTED).unwrap());
    assert!(binding.is_attached());
    assert_eq!(binding.listeners().len(), 3);
    assert_eq!(host.kinds(), WANTED.to_vec());
}

#[test]
fn attach_twice_is_noop() {
    let mut host = RecordingHost::default();
    let mut binding = Binding::new();
    binding.attach(&mut host, &WANTED).unwrap();
    assert!(!binding.attach(&mut host, &WANTED).unwrap());
    assert_eq!(host.active.len(), 3);
}

#[test]
fn detach_removes_exactly_recorded_listeners() {
    let mut host = RecordingHost::default();
    let foreign = host.listen(ListenerScope::Document, PointerEventKind::Move).unwrap();
    let mut binding = Binding::new();
    binding.attach(&mut host, &WANTED).unwrap();
    let ours = binding.listeners().to_vec();

    assert!(binding.detach(&mut host));

    assert_eq!(host.removed, ours);
    assert_eq!(host.active.len(), 1);
    assert_eq!(host.active[0].0, foreign);
    assert!(!binding.is_attached());
}

#[test]
fn detach_without_attach_is_noop() {
    let mut host = RecordingHost::default();
    let mut binding = Binding::new();
    assert!(!binding.detach(&mut host));
    assert!(!binding.detach(&mut host));
    assert!(host.removed.is_empty());
}

#[test]
fn failed_attach_rolls_back() {
    let mut host = RecordingHost { fail_at: Some(2), ..RecordingHost::default() };
    let mut binding = Binding::new();
    let err = binding.attach(&mut host, &WANTED).unwrap_err();
    assert!(matches!(err, BindingError::Listen { kind: PointerEventKind::Release, .. }));
    assert!(host.active.is_empty());
    assert_eq!(host.removed.len(), 2);
    assert!(!binding.is_attached());
}

#[test]
fn reattach_after_detach() {
    let mut host = RecordingHost::default();
    let mut binding = Binding::new();
    binding.attach(&mut host, &WANTED).unwrap();
    binding.detach(&mut host);
    assert!(binding.attach(&mut host, &WANTED).unwrap());
    assert_eq!(host.active.len(), 3);
}
