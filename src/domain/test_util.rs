use anyhow::anyhow;

/// Whether an in-memory driven port should behave like a reachable or unreachable service.
pub enum Connectivity {
    Connected,
    Disconnected,
}

impl Connectivity {
    /// Return an error if connectivity is in a "disconnected" state
    pub fn blow_up_if_disconnected(&self) -> Result<(), anyhow::Error> {
        match self {
            Self::Connected => Ok(()),
            Self::Disconnected => Err(anyhow!("could not connect to the database!")),
        }
    }
}

/// Records the arguments a mocked port method was called with and hands back a canned result.
/// Mock ports wrap themselves in a [std::sync::Mutex] so the recording can happen behind `&self`.
///
/// * `Args` is whatever should be captured per call
/// * `Ret` is the mocked method's return type
pub struct FakeImplementation<Args, Ret> {
    saved_arguments: Vec<Args>,
    return_value: Option<Ret>,
}

impl<Args, Ret> FakeImplementation<Args, Ret> {
    pub fn new() -> FakeImplementation<Args, Ret> {
        FakeImplementation {
            saved_arguments: Vec::new(),
            return_value: None,
        }
    }

    /// Saves arguments from a single invocation
    pub fn save_arguments(&mut self, arguments: Args) {
        self.saved_arguments.push(arguments)
    }

    /// Arguments passed on every call so far, oldest first
    pub fn calls(&self) -> &[Args] {
        self.saved_arguments.as_slice()
    }
}

impl<Args, Ret: Clone> FakeImplementation<Args, Ret> {
    pub fn set_return_value(&mut self, return_value: Ret) {
        self.return_value = Some(return_value)
    }

    pub fn return_value(&self) -> Ret {
        match self.return_value {
            None => panic!("Tried to return from a function where the return value wasn't set!"),
            Some(ref ret_val) => ret_val.clone(),
        }
    }
}
