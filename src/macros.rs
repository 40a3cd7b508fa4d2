/// Builds an [`Accessor`](crate::descriptor::Accessor) for a named field of a model type.
///
/// ```
/// use pubwire::access;
/// use pubwire::model::Contributor;
///
/// let name = access!(Contributor, name);
/// let mut contributor = Contributor::default();
/// *name.get_mut(&mut contributor) = Some("Jane".to_owned());
/// assert_eq!(name.get(&contributor).as_deref(), Some("Jane"));
/// ```
#[macro_export]
macro_rules! access {
    ($owner: ty, $field: ident) => {
        $crate::descriptor::Accessor::new(
            |owner: &$owner| &owner.$field,
            |owner: &mut $owner| &mut owner.$field,
        )
    };
}
