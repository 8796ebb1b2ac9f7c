use quickctor::*;

#[derive(Debug, PartialEq, Constructible)]
struct Named {
    label: &'static str,
    weight: Option<u32>,
}

#[derive(Debug, PartialEq, Constructible)]
struct Pair(u8, Vec<String>);

#[derive(Debug, PartialEq, Constructible)]
struct Marker;

#[derive(Debug, PartialEq)]
struct Temperature {
    kelvin: f64,
}

#[derive(Debug)]
struct BelowAbsoluteZero;

impl std::fmt::Display for BelowAbsoluteZero {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("below absolute zero")
    }
}

impl std::error::Error for BelowAbsoluteZero {}

#[constructors]
impl Temperature {
    #[ctor]
    fn kelvin(kelvin: f64) -> Result<Self, BelowAbsoluteZero> {
        if kelvin < 0.0 { Err(BelowAbsoluteZero) } else { Ok(Temperature { kelvin }) }
    }

    #[ctor]
    fn freezing() -> Temperature {
        Temperature { kelvin: 273.15 }
    }
}

#[derive(Debug, PartialEq)]
struct Percent(u8);

#[constructors]
impl Percent {
    #[ctor]
    pub fn new(value: u8) -> Result<Self, String> {
        if value > 100 { Err(format!("{} is above 100", value)) } else { Ok(Percent(value)) }
    }
}

#[derive(Debug, PartialEq)]
struct Username(String);

#[constructors]
impl Username {
    #[ctor]
    pub fn new(raw: String) -> Result<Self, &'static str> {
        if raw.is_empty() { Err("username must not be empty") } else { Ok(Username(raw)) }
    }
}

type Meters = Wrapper<f32>;

#[derive(Debug, PartialEq)]
struct Wrapper<T>(T);

#[constructors]
impl Meters {
    #[ctor]
    pub fn new(value: f32) -> Self {
        Wrapper(value)
    }
}

fn main() {
    let named = get_or_build_typed_factory::<fn(&'static str, Option<u32>) -> Named>().unwrap();
    assert_eq!(named.call(("a", Some(1))).unwrap(), Named { label: "a", weight: Some(1) });

    let pair = get_or_build_typed_factory::<fn(u8, Vec<String>) -> Pair>().unwrap();
    assert_eq!(pair.call((2, vec![])).unwrap(), Pair(2, vec![]));

    let marker = get_or_build_typed_factory::<fn() -> Marker>().unwrap();
    assert_eq!(marker.call(()).unwrap(), Marker);

    let freezing = get_or_build_typed_factory::<fn() -> Temperature>().unwrap();
    assert_eq!(freezing.call(()).unwrap(), Temperature { kelvin: 273.15 });

    let kelvin = get_or_build_typed_factory::<fn(f64) -> Temperature>().unwrap();
    assert!(matches!(kelvin.call((-1.0,)), Err(FactoryError::Construction(_))));

    let percent = get_or_build_typed_factory::<fn(u8) -> Percent>().unwrap();
    assert_eq!(percent.call((40,)).unwrap(), Percent(40));
    match percent.call((140,)) {
        Err(FactoryError::Construction(source)) => assert_eq!(source.to_string(), "140 is above 100"),
        other => panic!("unexpected {:?}", other),
    }

    let username = get_or_build_typed_factory::<fn(String) -> Username>().unwrap();
    assert_eq!(username.call(("ada".to_string(),)).unwrap(), Username("ada".to_string()));
    match username.call((String::new(),)) {
        Err(FactoryError::Construction(source)) => assert_eq!(source.to_string(), "username must not be empty"),
        other => panic!("unexpected {:?}", other),
    }

    let meters = get_or_build_typed_factory::<fn(f32) -> Meters>().unwrap();
    assert_eq!(meters.call((2.5,)).unwrap(), Wrapper(2.5));
}
