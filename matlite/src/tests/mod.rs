// Translator tests
mod translator;


// Runtime tests
mod operations;


// Plot tests
mod plot;
