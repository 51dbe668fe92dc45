quantity!(GramsPerKilowattHour, via: f64, suffix: "g/kWh", precision: 1);
