quantity!(Grams, suffix: "g", precision: 0);
