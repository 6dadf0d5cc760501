/// Fixed interval between session-status fetches.
pub const SESSION_POLL_MS: u64 = 5000;
/// Fast tick that re-renders the countdown between fetches.
pub const COUNTDOWN_TICK_MS: u64 = 1000;
/// How long the input loop waits for a key before draining messages.
pub const EVENT_POLL_MS: u64 = 50;

pub const TITLE_PROCESOS: &str = " Procesos ";
pub const TITLE_DOCUMENTOS: &str = " Documentos ";

pub const HELP_PROCESOS: &str =
    " n:patente  t:taller  T:nuevo taller  s:enviar  espacio:marcar  a:todos  d:eliminar  r:reintentar  e:detalle  w:taller fila  /:buscar  g/G:fechas  E/C/P:estado  c:limpiar  f/p:orden  [ ]:pagina  Tab:panel  q:salir ";
pub const HELP_DOCUMENTOS: &str =
    " u:agregar imagen  x:quitar  v:previsualizar  m:nombre  h:mejora  b:generar PDF  Tab:panel  q:salir ";
pub const HELP_INPUT: &str = " Enter:aceptar  Esc:cancelar ";
pub const HELP_MODAL: &str = " Enter:confirmar  Esc:cancelar ";
