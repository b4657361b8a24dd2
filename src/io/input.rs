//! Operator input - vehicle type selection and registration numbers

use crate::domain::error::ParkingError;
use std::io::{BufRead, Write};
use tracing::{debug, warn};

/// Supplies operator choices to the parking service
pub trait InputSource {
    /// Read a numeric menu selection
    fn read_selection(&mut self) -> Result<i32, ParkingError>;

    /// Read a non-empty vehicle registration number
    fn read_vehicle_registration_number(&mut self) -> Result<String, ParkingError>;

    /// Read the vehicle type menu selection (1 = car, 2 = bike)
    fn read_vehicle_type_selection(&mut self) -> Result<i32, ParkingError> {
        self.read_selection()
    }
}

/// Interactive line-oriented input: prompts go to `prompt`, answers are
/// read one line at a time from `reader`.
pub struct ConsoleInput<R, W> {
    reader: R,
    prompt: W,
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    pub fn new(reader: R, prompt: W) -> Self {
        Self { reader, prompt }
    }

    fn say(&mut self, lines: &[&str]) -> Result<(), ParkingError> {
        for line in lines {
            writeln!(self.prompt, "{line}")?;
        }
        self.prompt.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, ParkingError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ParkingError::EndOfInput);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> InputSource for ConsoleInput<R, W> {
    fn read_selection(&mut self) -> Result<i32, ParkingError> {
        let line = self.read_line()?;
        line.parse::<i32>().map_err(|e| {
            warn!(input = %line, error = %e, "selection_parse_failed");
            ParkingError::Input(format!("'{line}' is not a menu number"))
        })
    }

    fn read_vehicle_registration_number(&mut self) -> Result<String, ParkingError> {
        self.say(&["Please type the vehicle registration number and press enter key"])?;
        let line = self.read_line()?;
        if line.is_empty() {
            return Err(ParkingError::Input("vehicle registration number is empty".to_string()));
        }
        debug!(vehicle = %line, "registration_number_read");
        Ok(line)
    }

    fn read_vehicle_type_selection(&mut self) -> Result<i32, ParkingError> {
        self.say(&["Please select vehicle type from menu", "1 CAR", "2 BIKE"])?;
        self.read_selection()
    }
}
