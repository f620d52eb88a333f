use prefroom::PreferenceEntity;

#[derive(Default, PreferenceEntity)]
pub struct Flags {
    #[preference(default = "yes")]
    enabled: bool,
}

fn main() {
    let flags = Flags::default();
    let _ = flags.enabled;
}
