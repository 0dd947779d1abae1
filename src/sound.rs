use beep::beep;
use std::error::Error;

/// drives the buzzer from the machine's sound timer
pub trait Sound {
    /// called once per frame with whether the sound timer is running
    fn update(&mut self, active: bool) -> Result<(), Box<dyn Error>>;
}

const BUZZER_PITCH: u16 = 2093; // C7

/// PC-speaker buzzer; beeps for as long as the timer runs
pub struct Buzzer {
    sounding: bool,
}

impl Buzzer {
    pub fn new() -> Self {
        Buzzer { sounding: false }
    }
}

impl Sound for Buzzer {
    fn update(&mut self, active: bool) -> Result<(), Box<dyn Error>> {
        if active != self.sounding {
            beep(if active { BUZZER_PITCH } else { 0 })?;
            self.sounding = active;
        }
        Ok(())
    }
}

impl Drop for Buzzer {
    // the kernel keeps a speaker tone going until told otherwise
    fn drop(&mut self) {
        if self.sounding {
            let _ = beep(0);
        }
    }
}

/// silent stand-in for machines without a speaker (the default)
pub struct Mute;

impl Sound for Mute {
    fn update(&mut self, _active: bool) -> Result<(), Box<dyn Error>> {
        Ok(())
    }
}
